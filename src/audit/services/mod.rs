//! Application services for recording and querying audit history.

mod trail;

pub use trail::AuditTrailService;
