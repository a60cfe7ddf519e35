use crate::error::CommonError;

/// Result alias for file access and other shared operations
pub type CommonResult<T> = Result<T, CommonError>;
