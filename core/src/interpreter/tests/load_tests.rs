//! Loading through the interpreter boundary

use std::io::{self, Read};

use super::helpers::vm_with_output;
use crate::interpreter::{errors, Interpreter, Val};

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "device not ready"))
    }
}

#[test]
fn test_load_from_reader() {
    let (mut vm, _) = vm_with_output();
    let mut source = io::Cursor::new(b"SPEED = 3 * 4\n".to_vec());

    vm.load(&mut source, "speed.rb");

    assert!(vm.fault().is_none());
    assert_eq!(vm.constant("SPEED"), Some(&Val::Int(12)));
}

#[test]
fn test_read_failure_faults() {
    let (mut vm, _) = vm_with_output();

    vm.load(&mut FailingReader, "flaky.rb");

    let fault = vm.fault().expect("read failure should fault");
    assert_eq!(fault.class, errors::IO_ERROR);
    assert!(fault.to_string().starts_with("flaky.rb: "));
}

#[test]
fn test_invalid_utf8_faults() {
    let (mut vm, _) = vm_with_output();
    let mut source: &[u8] = &[b'X', b' ', b'=', b' ', 0xff];

    vm.load(&mut source, "binary.rb");

    assert_eq!(vm.fault().map(|f| f.class.as_str()), Some(errors::IO_ERROR));
    assert_eq!(vm.constant("X"), None);
}
