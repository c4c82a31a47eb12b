//! Exceptions crossing the boundary in either direction

use tracing::debug;

use crate::bridge::Bridge;
use crate::error::{BridgeError, ForeignError};
use crate::foreign::{ForeignException, ForeignValue};
use crate::value::HostValue;

/// Surface a foreign exception in host code.
///
/// The result is always [`BridgeError::Foreign`], the one host-side type
/// reserved for foreign failures. Its payload is the exception's carried
/// value in host representation; a payload that cannot be converted is
/// replaced by the exception's message.
pub fn translate_foreign_exception(bridge: &Bridge, exception: ForeignException) -> BridgeError {
    let payload = bridge
        .to_host(&exception.payload)
        .unwrap_or_else(|_| HostValue::string(exception.message()));
    debug!(
        class = %exception.class_name,
        message = %exception.message(),
        "foreign exception raised into host"
    );
    BridgeError::Foreign(ForeignError {
        class_name: exception.class_name.clone(),
        payload,
        original: exception,
    })
}

/// Surface a host failure in foreign code.
///
/// A foreign exception on its way back out is re-raised unchanged. Any
/// other failure becomes a `HostException` carrying the host payload, or
/// the error message when the failure was detected by the bridge itself.
pub fn translate_host_error(bridge: &Bridge, error: BridgeError) -> ForeignException {
    let exception = match error {
        BridgeError::Foreign(foreign) => foreign.original,
        BridgeError::Host(host) => {
            let payload = bridge
                .to_foreign(&host.payload)
                .unwrap_or_else(|_| ForeignValue::string(host.to_string()));
            ForeignException::from_host(payload)
        }
        other => ForeignException::from_host(ForeignValue::string(other.to_string())),
    };
    debug!(
        class = %exception.class_name,
        message = %exception.message(),
        "host failure raised into foreign code"
    );
    exception
}
