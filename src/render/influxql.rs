use std::fmt::{self, Write};
use std::time::Duration;

use super::{
    Aggregate, CmpOp, Combinator, Literal, Predicate, QueryPlan, QueryRenderer, Selection,
};

/// Renders InfluxQL `SELECT` statements.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfluxQlRenderer;

impl QueryRenderer for InfluxQlRenderer {
    fn label_prefix(&self) -> &'static str {
        "InfluxQL"
    }

    fn render(&self, plan: &QueryPlan<'_>, out: &mut String) -> fmt::Result {
        out.push_str("SELECT ");
        match plan.selection {
            Selection::All => out.push('*'),
            Selection::Aggregate { func, fields } => {
                let func = match func {
                    Aggregate::Max => "max",
                    Aggregate::Mean => "mean",
                };
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write!(out, "{}({})", func, field)?;
                }
            }
        }
        write!(out, " FROM {}", plan.measurement)?;

        let mut has_where = false;
        if let Some(filter) = &plan.filter {
            let joiner = match filter.combinator {
                Combinator::And => " AND ",
                Combinator::Or => " OR ",
            };
            out.push_str(" WHERE (");
            for (i, predicate) in filter.predicates.iter().enumerate() {
                if i > 0 {
                    out.push_str(joiner);
                }
                write_predicate(out, predicate)?;
            }
            out.push(')');
            has_where = true;
        }

        if let Some(window) = plan.window {
            out.push_str(if has_where { " AND " } else { " WHERE " });
            write!(
                out,
                "time >= '{}' AND time < '{}'",
                window.start_string(),
                window.end_string()
            )?;
        }

        match (plan.bucketing, plan.last_per) {
            (Some(b), _) => write!(out, " GROUP BY time({}),{}", duration_literal(b.every), b.tag)?,
            (None, Some(tag)) => write!(out, " GROUP BY {} ORDER BY time DESC LIMIT 1", tag)?,
            (None, None) => {}
        }

        Ok(())
    }
}

fn write_predicate(out: &mut String, predicate: &Predicate) -> fmt::Result {
    let op = match predicate.op {
        CmpOp::Eq => "=",
        CmpOp::Gt => ">",
        CmpOp::Lt => "<",
    };
    match predicate.value {
        Literal::Host(_) => write!(out, "{} {} '{}'", predicate.field, op, predicate.value),
        Literal::Float(_) | Literal::Int(_) => {
            write!(out, "{} {} {}", predicate.field, op, predicate.value)
        }
    }
}

/// InfluxQL duration literal, using the largest unit that divides evenly.
fn duration_literal(d: Duration) -> String {
    let nanos = d.as_nanos();
    const UNITS: [(u128, &str); 6] = [
        (86_400_000_000_000, "d"),
        (3_600_000_000_000, "h"),
        (60_000_000_000, "m"),
        (1_000_000_000, "s"),
        (1_000_000, "ms"),
        (1_000, "u"),
    ];
    for (size, suffix) in UNITS {
        if nanos >= size && nanos % size == 0 {
            return format!("{}{}", nanos / size, suffix);
        }
    }
    format!("{}ns", nanos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_literal() {
        assert_eq!(duration_literal(Duration::from_secs(60)), "1m");
        assert_eq!(duration_literal(Duration::from_secs(3600)), "1h");
        assert_eq!(duration_literal(Duration::from_secs(90)), "90s");
        assert_eq!(duration_literal(Duration::from_millis(1500)), "1500ms");
    }
}
