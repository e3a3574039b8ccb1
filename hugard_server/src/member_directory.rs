use std::{collections::HashMap, sync::Arc};

use hugard_common::sanitize_display_name;
use tokio::sync::RwLock;

use crate::data_objects::Member;

/// Remembers the sanitized display name of every member seen in a command, so that reports and settlement
/// notifications can name payers. Only the id is ever stored in the ledger.
#[derive(Debug, Clone, Default)]
pub struct MemberDirectory {
    names: Arc<RwLock<HashMap<String, String>>>,
}

impl MemberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn remember(&self, member: &Member) {
        self.names.write().await.insert(member.id.clone(), member.safe_name());
    }

    /// The last known display name for `member_id`, falling back to the sanitized id.
    pub async fn display_name(&self, member_id: &str) -> String {
        self.names.read().await.get(member_id).cloned().unwrap_or_else(|| sanitize_display_name(member_id))
    }
}
