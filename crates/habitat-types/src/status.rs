use std::collections::BTreeMap;

/// Key of the server start-time marker inside [`Status`].
pub const START_TIME: &str = "startTime";

/// Free-form server bookkeeping, persisted outside the hierarchy.
pub type Status = BTreeMap<String, String>;
