//! Faults raised by script code

use super::helpers::{load_expect_fault, load_str, vm_with_output};
use crate::interpreter::{errors, Interpreter, Val};

#[test]
fn test_raise_message_and_position() {
    let (mut vm, _) = vm_with_output();
    let diagnostic = load_expect_fault(&mut vm, "A = 1\nraise \"boom\"");
    assert_eq!(diagnostic, "test.rb:2: boom (RuntimeError)");
}

#[test]
fn test_raise_with_class() {
    let (mut vm, _) = vm_with_output();
    let diagnostic = load_expect_fault(&mut vm, "raise ArgumentError, \"bad value\"");
    assert_eq!(diagnostic, "test.rb:1: bad value (ArgumentError)");
}

#[test]
fn test_bare_raise() {
    let (mut vm, _) = vm_with_output();
    let diagnostic = load_expect_fault(&mut vm, "raise");
    assert_eq!(diagnostic, "test.rb:1: unhandled exception (RuntimeError)");
}

#[test]
fn test_raise_non_string() {
    let (mut vm, _) = vm_with_output();
    let diagnostic = load_expect_fault(&mut vm, "raise 42");
    assert!(diagnostic.contains(errors::TYPE_ERROR), "{}", diagnostic);
}

#[test]
fn test_fault_leaves_earlier_statements_applied() {
    let (mut vm, output) = vm_with_output();

    load_str(&mut vm, "BEFORE = 1\nputs \"ran\"\nraise \"stop\"\nAFTER = 2", "partial.rb");

    let fault = vm.fault().expect("fault expected");
    assert_eq!(fault.line, Some(3));
    assert_eq!(vm.constant("BEFORE"), Some(&Val::Int(1)));
    assert_eq!(vm.constant("AFTER"), None);
    assert_eq!(output.contents(), "ran\n");
}

#[test]
fn test_syntax_error_runs_nothing() {
    let (mut vm, _) = vm_with_output();

    load_str(&mut vm, "EARLY = 1\nLATE = (2 +", "broken.rb");

    let fault = vm.fault().expect("syntax error expected");
    assert_eq!(fault.class, errors::SYNTAX_ERROR);
    assert_eq!(fault.file.as_deref(), Some("broken.rb"));
    assert_eq!(vm.constant("EARLY"), None);
}

#[test]
fn test_undefined_constant() {
    let (mut vm, _) = vm_with_output();
    let diagnostic = load_expect_fault(&mut vm, "Y = X + 1");
    assert_eq!(diagnostic, "test.rb:1: uninitialized constant X (NameError)");
}

#[test]
fn test_division_by_zero() {
    let (mut vm, _) = vm_with_output();
    let diagnostic = load_expect_fault(&mut vm, "\n\nQ = 10 / (5 - 5)");
    assert_eq!(diagnostic, "test.rb:3: divided by 0 (ZeroDivisionError)");
}

#[test]
fn test_context_usable_after_clear() {
    let (mut vm, _) = vm_with_output();

    load_expect_fault(&mut vm, "raise \"first\"");
    assert!(vm.fault().is_none());

    load_str(&mut vm, "Z = 5", "ok.rb");
    assert!(vm.fault().is_none());
    assert_eq!(vm.constant("Z"), Some(&Val::Int(5)));
}
