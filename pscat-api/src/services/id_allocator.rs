//! Custom identifier allocation
//!
//! Assigns `PREFIX + zero-padded sequence` identifiers to records that do not
//! already carry a valid one. Runs on the connection of the insert
//! transaction: the per-domain counter increment, the collision check and the
//! insert commit together or not at all.
//!
//! **Algorithm:**
//! 1. Look up the domain prefix (`GEN` for unmapped domains)
//! 2. Atomically advance the domain's counter
//! 3. Format the candidate (`AIM004`)
//! 4. If the candidate is already taken (manually assigned, or another domain
//!    sharing `GEN`), advance again
//!
//! A sequence beyond 999 fails with `Error::SequenceExhausted`.

use pscat_common::catalog::prefix_for_domain;
use pscat_common::custom_id::{format_custom_id, is_valid_custom_id};
use pscat_common::Result;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::db::{problems, sequences};

/// Insert attempts for records whose identifier is generated
pub const MAX_ALLOCATION_ATTEMPTS: usize = 3;

/// Whether the allocator must run for a record carrying `custom_id`
///
/// Well-formed identifiers are preserved verbatim.
pub fn needs_allocation(custom_id: Option<&str>) -> bool {
    !custom_id.is_some_and(is_valid_custom_id)
}

/// Allocate the next free identifier for `domain`
pub async fn allocate_custom_id(conn: &mut SqliteConnection, domain: &str) -> Result<String> {
    let prefix = prefix_for_domain(domain);

    loop {
        let sequence = sequences::next_sequence(conn, domain).await?;
        let candidate = format_custom_id(prefix, sequence, domain)?;

        if !problems::custom_id_exists(conn, &candidate).await? {
            debug!(domain = %domain, custom_id = %candidate, "Allocated custom id");
            return Ok(candidate);
        }

        debug!(
            domain = %domain,
            custom_id = %candidate,
            "Candidate custom id already taken, advancing sequence"
        );
    }
}
