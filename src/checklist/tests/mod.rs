//! Unit tests for checklist items, the pure validator, and the gate.
