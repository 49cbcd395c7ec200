//! Test helpers for VM tests

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use crate::interpreter::{Interpreter, ScriptVm};

/// Output sink that can be read back after the VM took ownership of it
#[derive(Clone, Default)]
pub struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// VM with captured output
pub fn vm_with_output() -> (ScriptVm, SharedOutput) {
    let output = SharedOutput::default();
    (ScriptVm::with_output(output.clone()), output)
}

/// Load a source string through the interpreter boundary
pub fn load_str(vm: &mut ScriptVm, source: &str, filename: &str) {
    let mut reader = source.as_bytes();
    vm.load(&mut reader, filename);
}

/// Load a source string and return the diagnostic, clearing the fault
pub fn load_expect_fault(vm: &mut ScriptVm, source: &str) -> String {
    load_str(vm, source, "test.rb");
    let diagnostic = vm
        .fault()
        .map(|fault| fault.to_string())
        .unwrap_or_else(|| panic!("expected a fault from {:?}", source));
    vm.clear_fault();
    diagnostic
}
