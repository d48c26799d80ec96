//! User-facing lookup messages. These strings are part of the visible
//! contract of the lookup form and are asserted verbatim by tests.

pub const EMPTY_ADDRESS_MESSAGE: &str = "Please enter an address";
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Failed to connect to the server. Please try again.";
pub const ADDRESS_NOT_FOUND_MESSAGE: &str = "Address not found";
