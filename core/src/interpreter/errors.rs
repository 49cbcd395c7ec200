//! Exception class names raised by the VM

pub const RUNTIME_ERROR: &str = "RuntimeError";
pub const NAME_ERROR: &str = "NameError";
pub const NO_METHOD_ERROR: &str = "NoMethodError";
pub const TYPE_ERROR: &str = "TypeError";
pub const ARGUMENT_ERROR: &str = "ArgumentError";
pub const ZERO_DIVISION_ERROR: &str = "ZeroDivisionError";
pub const SYNTAX_ERROR: &str = "SyntaxError";
pub const IO_ERROR: &str = "IOError";

/// Message for a bare `raise`
pub const UNHANDLED_EXCEPTION: &str = "unhandled exception";
