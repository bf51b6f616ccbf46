//! `CREATE PROCEDURE` generation.
//!
//! Procedure bodies contain `;`, so every block switches the terminator to
//! [`ROUTINE_TERMINATOR`] first and restores the default afterwards:
//!
//! ```text
//! SET TERM $$ ;
//! CREATE PROCEDURE ADD_ONE (X INTEGER)
//! RETURNS (Y INTEGER) AS
//! BEGIN
//!   Y = X + 1;
//!   SUSPEND;
//! END
//! $$
//! SET TERM ; $$
//! ```

use crate::catalog::{ParameterDescriptor, ParameterDirection, RoutineDescriptor};
use crate::script::DEFAULT_TERMINATOR;

/// Terminator in effect inside a generated routine block.
pub const ROUTINE_TERMINATOR: &str = "$$";

/// Renders one routine as a self-contained block.
///
/// Returns `None` when the routine has no source. `parameters` must be in
/// catalog order (direction, then number).
#[must_use]
pub fn render_routine(
    routine: &RoutineDescriptor,
    parameters: &[ParameterDescriptor],
) -> Option<String> {
    let body = routine.body()?;

    let inputs = parameter_list(parameters, ParameterDirection::Input);
    let outputs = parameter_list(parameters, ParameterDirection::Output);

    let mut sql = format!("SET TERM {ROUTINE_TERMINATOR} {DEFAULT_TERMINATOR}\n");
    sql.push_str("CREATE PROCEDURE ");
    sql.push_str(&routine.name);
    if let Some(inputs) = inputs {
        sql.push_str(" (");
        sql.push_str(&inputs);
        sql.push(')');
    }
    if let Some(outputs) = outputs {
        sql.push_str("\nRETURNS (");
        sql.push_str(&outputs);
        sql.push(')');
    }
    sql.push_str(" AS\n");
    sql.push_str(body);
    sql.push('\n');
    sql.push_str(ROUTINE_TERMINATOR);
    sql.push('\n');
    sql.push_str(&format!(
        "SET TERM {DEFAULT_TERMINATOR} {ROUTINE_TERMINATOR}\n"
    ));
    Some(sql)
}

fn parameter_list(parameters: &[ParameterDescriptor], direction: ParameterDirection) -> Option<String> {
    let declarations: Vec<String> = parameters
        .iter()
        .filter(|p| p.direction == direction)
        .map(ParameterDescriptor::declaration)
        .collect();
    (!declarations.is_empty()).then(|| declarations.join(", "))
}
