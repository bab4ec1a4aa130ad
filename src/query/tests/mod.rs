//! Pipeline tests wired against in-memory adapters and mocks.
