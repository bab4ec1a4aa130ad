//! Worker tests wired against in-memory adapters.
