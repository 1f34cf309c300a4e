use std::fmt::{self, Write};

use super::{Aggregate, CmpOp, Combinator, Predicate, QueryPlan, QueryRenderer, Selection};

/// Renders `new_ioql_query(...)` calls with nanosecond epoch time conditions.
#[derive(Debug, Clone, Copy, Default)]
pub struct IoqlRenderer;

impl QueryRenderer for IoqlRenderer {
    fn label_prefix(&self) -> &'static str {
        "Iobeam"
    }

    fn render(&self, plan: &QueryPlan<'_>, out: &mut String) -> fmt::Result {
        out.push_str("new_ioql_query(\n");
        out.push_str("\tproject_id => 1::bigint,\n");
        writeln!(out, "\tnamespace_name => '{}',", plan.measurement)?;

        out.push_str("\tselect_field => ");
        match plan.selection {
            Selection::All => out.push_str("NULL"),
            Selection::Aggregate { func, fields } => {
                let func = match func {
                    Aggregate::Max => "MAX",
                    Aggregate::Mean => "AVG",
                };
                out.push_str("ARRAY[");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write!(out, "new_select_item('{}'::text, '{}')", field, func)?;
                }
                out.push(']');
            }
        }
        out.push_str(",\n");

        out.push_str("\taggregate => ");
        match plan.bucketing {
            Some(b) => write!(out, "new_aggregate({}, '{}')", b.every.as_nanos(), b.tag)?,
            None => out.push_str("NULL"),
        }
        out.push_str(",\n");

        out.push_str("\ttime_condition => ");
        match plan.window {
            Some(w) => write!(
                out,
                "new_time_condition({}, {})",
                w.start_nanos(),
                w.end_nanos()
            )?,
            None => out.push_str("NULL"),
        }
        out.push_str(",\n");

        out.push_str("\tfield_condition => ");
        match &plan.filter {
            Some(filter) => {
                let combinator = match filter.combinator {
                    Combinator::And => "AND",
                    Combinator::Or => "OR",
                };
                write!(out, "new_field_condition('{}', ARRAY[", combinator)?;
                for (i, predicate) in filter.predicates.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_predicate(out, predicate)?;
                }
                out.push_str("])");
            }
            None => out.push_str("NULL"),
        }
        out.push_str(",\n");

        out.push_str("\tlimit_rows => NULL,\n");
        out.push_str("\tlimit_time_periods => NULL,\n");
        out.push_str("\tlimit_by_field => ");
        match plan.last_per {
            Some(tag) => write!(out, "new_limit_by_field('{}', 1)", tag)?,
            None => out.push_str("NULL"),
        }
        out.push_str(",\n");
        out.push_str("\ttotal_partitions => 1\n)");

        Ok(())
    }
}

fn write_predicate(out: &mut String, predicate: &Predicate) -> fmt::Result {
    let op = match predicate.op {
        CmpOp::Eq => "=",
        CmpOp::Gt => ">",
        CmpOp::Lt => "<",
    };
    // ioql compares every value as text
    write!(
        out,
        "new_field_predicate('{}', '{}', '{}'::text)",
        predicate.field, op, predicate.value
    )
}
