//! Cross-module unit tests for priv8-syntax.
