//! Validators for the reference entities (positions and clearances).

use super::{MAX_TEXT_BYTES, Validator};

pub fn validate_title(v: &mut Validator, title: &str) {
    v.check(!title.is_empty(), "title", "must be provided");
    v.check(title.len() <= MAX_TEXT_BYTES, "title", "must not be more than 256 bytes");
}

pub fn validate_description(v: &mut Validator, description: &str) {
    v.check(!description.is_empty(), "description", "must be provided");
    v.check(
        description.len() <= MAX_TEXT_BYTES,
        "description",
        "must not be more than 256 bytes",
    );
}
