//! Mailbox configuration contract tests
//!
//! The JSON field names and enum spellings are part of the contract with
//! deployed configuration files.

// ===== Field Names =====
const FIELD_ATTRIBUTES: &str = "attributes";
const FIELD_REQUEST_TIMEOUT: &str = "request_timeout";
const FIELD_CORRUPTION_POLICY: &str = "corruption_policy";
const FIELD_DUMP_DIRECTORY: &str = "dump_directory";

// ===== Contract Tests =====
