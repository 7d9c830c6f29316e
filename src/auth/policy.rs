use serde::{Deserialize, Serialize};

use crate::auth::{AuthError, Claims};

/// No access at all.
pub const PRIVILEGE_NONE: i32 = 0;
/// May list and read records.
pub const PRIVILEGE_READ: i32 = 1;
/// May also create, modify and delete records.
pub const PRIVILEGE_WRITE: i32 = 2;

/// Coarse classes of request gated by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn is_read(self) -> bool {
        matches!(self, Operation::List | Operation::Get)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Minimum privilege per operation class.
#[derive(Debug, Clone, Copy)]
pub struct AccessPolicy {
    pub read: i32,
    pub write: i32,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            read: PRIVILEGE_READ,
            write: PRIVILEGE_WRITE,
        }
    }
}

impl AccessPolicy {
    pub fn required_for(&self, operation: Operation) -> i32 {
        if operation.is_read() {
            self.read
        } else {
            self.write
        }
    }

    pub fn authorize(&self, claims: &Claims, required: i32) -> Decision {
        if claims.privilege >= required {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }

    /// Gate `operation` on the caller's claims.
    pub fn require(&self, claims: &Claims, operation: Operation) -> Result<(), AuthError> {
        let required = self.required_for(operation);
        match self.authorize(claims, required) {
            Decision::Allow => Ok(()),
            Decision::Deny => {
                tracing::warn!(
                    subject = %claims.subject,
                    privilege = claims.privilege,
                    required,
                    ?operation,
                    "Access denied"
                );
                Err(AuthError::InsufficientPrivilege {
                    required,
                    actual: claims.privilege,
                })
            }
        }
    }
}
