use std::collections::HashSet;

use crate::js::syntax::ast::{JsProgram, NodeId};

/// Delete the statements with the given ids, wherever they are nested.
/// Returns the number of statements removed.
pub fn remove_statements(program: &mut JsProgram, ids: &HashSet<NodeId>) -> usize {
    if ids.is_empty() {
        return 0;
    }
    let mut removed = 0;
    program.retain_statements(&mut |stmt| {
        if ids.contains(&stmt.id()) {
            removed += 1;
            false
        } else {
            true
        }
    });
    removed
}
