//! The devops catalog: cpu and mem access patterns over a simulated fleet

use rand::Rng;
use std::time::Duration;

use super::{Scenario, ScenarioContext};
use crate::error::{GenError, Result};
use crate::query::{QueryCarrier, WILDCARD};
use crate::render::{
    Aggregate, Bucketing, CmpOp, Combinator, Filter, Literal, Predicate, QueryPlan, Selection,
};
use crate::sample::fleet::{random_host, sample_hosts, HOST_TAG};

/// Measurements written by the devops data set.
pub const MEASUREMENTS: &[&str] = &[
    "cpu",
    "diskio",
    "disk",
    "kernel",
    "mem",
    "net",
    "nginx",
    "postgresl",
    "redis",
];

pub const CPU_FIELDS: &[&str] = &[
    "usage_user",
    "usage_system",
    "usage_idle",
    "usage_nice",
    "usage_iowait",
    "usage_irq",
    "usage_softirq",
    "usage_steal",
    "usage_guest",
    "usage_guest_nice",
];

const USAGE_USER: &[&str] = &["usage_user"];
const USED_PERCENT: &[&str] = &["used_percent"];

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(3600);
const HALF_DAY: Duration = Duration::from_secs(12 * 3600);
const DAY: Duration = Duration::from_secs(24 * 3600);

const CPU_THRESHOLD: f64 = 90.0;

pub const SCENARIOS: &[Scenario] = &[
    Scenario::new("cpu-max-1-host", cpu_max_1_host),
    Scenario::new("cpu-max-2-hosts", cpu_max_2_hosts),
    Scenario::new("cpu-max-4-hosts", cpu_max_4_hosts),
    Scenario::new("cpu-max-8-hosts", cpu_max_8_hosts),
    Scenario::new("cpu-max-16-hosts", cpu_max_16_hosts),
    Scenario::new("cpu-max-32-hosts", cpu_max_32_hosts),
    Scenario::new("cpu-max-all-fields-1-host", cpu_max_all_fields_1_host),
    Scenario::new("cpu-max-all-fields-8-hosts", cpu_max_all_fields_8_hosts),
    Scenario::new("cpu-mean-all-hosts", cpu_mean_all_hosts),
    Scenario::new("last-point-per-host", last_point_per_host),
    Scenario::new("high-cpu-all-hosts", high_cpu_all_hosts),
    Scenario::new("high-cpu-1-host", high_cpu_1_host),
    Scenario::new("mem-or-all-hosts", mem_or_all_hosts),
    Scenario::new("mem-or-by-host", mem_or_by_host),
];

fn cpu_max_1_host(ctx: &mut ScenarioContext<'_>, q: &mut QueryCarrier, scale: usize) -> Result<()> {
    cpu_max_n_hosts(ctx, q, scale, "cpu-max-1-host", 1, USAGE_USER)
}

fn cpu_max_2_hosts(
    ctx: &mut ScenarioContext<'_>,
    q: &mut QueryCarrier,
    scale: usize,
) -> Result<()> {
    cpu_max_n_hosts(ctx, q, scale, "cpu-max-2-hosts", 2, USAGE_USER)
}

fn cpu_max_4_hosts(
    ctx: &mut ScenarioContext<'_>,
    q: &mut QueryCarrier,
    scale: usize,
) -> Result<()> {
    cpu_max_n_hosts(ctx, q, scale, "cpu-max-4-hosts", 4, USAGE_USER)
}

fn cpu_max_8_hosts(
    ctx: &mut ScenarioContext<'_>,
    q: &mut QueryCarrier,
    scale: usize,
) -> Result<()> {
    cpu_max_n_hosts(ctx, q, scale, "cpu-max-8-hosts", 8, USAGE_USER)
}

fn cpu_max_16_hosts(
    ctx: &mut ScenarioContext<'_>,
    q: &mut QueryCarrier,
    scale: usize,
) -> Result<()> {
    cpu_max_n_hosts(ctx, q, scale, "cpu-max-16-hosts", 16, USAGE_USER)
}

fn cpu_max_32_hosts(
    ctx: &mut ScenarioContext<'_>,
    q: &mut QueryCarrier,
    scale: usize,
) -> Result<()> {
    cpu_max_n_hosts(ctx, q, scale, "cpu-max-32-hosts", 32, USAGE_USER)
}

fn cpu_max_all_fields_1_host(
    ctx: &mut ScenarioContext<'_>,
    q: &mut QueryCarrier,
    scale: usize,
) -> Result<()> {
    cpu_max_n_hosts(ctx, q, scale, "cpu-max-all-fields-1-host", 1, CPU_FIELDS)
}

fn cpu_max_all_fields_8_hosts(
    ctx: &mut ScenarioContext<'_>,
    q: &mut QueryCarrier,
    scale: usize,
) -> Result<()> {
    cpu_max_n_hosts(ctx, q, scale, "cpu-max-all-fields-8-hosts", 8, CPU_FIELDS)
}

/// max(fields) over a random 12h window for `nhosts` distinct hosts, by 1m and host.
///
/// SELECT max(usage_user) FROM cpu
/// WHERE (hostname = 'host_a' OR ...) AND <12h window>
/// GROUP BY time(1m),hostname
pub fn cpu_max_n_hosts(
    ctx: &mut ScenarioContext<'_>,
    q: &mut QueryCarrier,
    scale: usize,
    name: &'static str,
    nhosts: usize,
    fields: &'static [&'static str],
) -> Result<()> {
    if scale < nhosts {
        return Err(GenError::InsufficientFleetSize {
            scenario: name,
            needed: nhosts,
            scale,
        });
    }

    let window = ctx.interval.random_window(ctx.rng, HALF_DAY)?;
    let hosts = sample_hosts(ctx.rng, scale, nhosts)?;

    let plan = QueryPlan {
        selection: Selection::Aggregate {
            func: Aggregate::Max,
            fields,
        },
        window: Some(window),
        filter: Some(Filter {
            combinator: Combinator::Or,
            predicates: hosts
                .names()
                .map(|host| Predicate {
                    field: HOST_TAG,
                    op: CmpOp::Eq,
                    value: Literal::Host(host),
                })
                .collect(),
        }),
        bucketing: Some(Bucketing {
            every: MINUTE,
            tag: HOST_TAG,
        }),
        ..QueryPlan::new("cpu")
    };

    let all_fields = if fields.len() > 1 { " all fields" } else { "" };
    ctx.emit(
        q,
        &plan,
        fields[0],
        format_args!("max cpu{}, rand {:4} hosts, rand 12hr by 1m", all_fields, nhosts),
        format_args!("{}", window.start_string()),
    );
    Ok(())
}

/// SELECT mean(usage_user) FROM cpu WHERE <24h window> GROUP BY time(1h),hostname
fn cpu_mean_all_hosts(ctx: &mut ScenarioContext<'_>, q: &mut QueryCarrier, _: usize) -> Result<()> {
    let window = ctx.interval.random_window(ctx.rng, DAY)?;

    let plan = QueryPlan {
        selection: Selection::Aggregate {
            func: Aggregate::Mean,
            fields: USAGE_USER,
        },
        window: Some(window),
        bucketing: Some(Bucketing {
            every: HOUR,
            tag: HOST_TAG,
        }),
        ..QueryPlan::new("cpu")
    };

    ctx.emit(
        q,
        &plan,
        "usage_user",
        format_args!("mean cpu, all hosts, rand 1day by 1hour"),
        format_args!("{}", window.start_string()),
    );
    Ok(())
}

/// Most recent row per host of one random measurement, no window.
fn last_point_per_host(
    ctx: &mut ScenarioContext<'_>,
    q: &mut QueryCarrier,
    _: usize,
) -> Result<()> {
    let measurement = MEASUREMENTS[ctx.rng.gen_range(0..MEASUREMENTS.len())];

    let plan = QueryPlan {
        last_per: Some(HOST_TAG),
        ..QueryPlan::new(measurement)
    };

    ctx.emit(
        q,
        &plan,
        WILDCARD,
        format_args!("last row per host"),
        format_args!("{}", measurement),
    );
    Ok(())
}

/// SELECT * FROM cpu WHERE usage_user > 90.0 AND <24h window>
fn high_cpu_all_hosts(ctx: &mut ScenarioContext<'_>, q: &mut QueryCarrier, _: usize) -> Result<()> {
    let window = ctx.interval.random_window(ctx.rng, DAY)?;

    let plan = QueryPlan {
        window: Some(window),
        filter: Some(Filter {
            combinator: Combinator::And,
            predicates: vec![cpu_over_threshold()],
        }),
        ..QueryPlan::new("cpu")
    };

    ctx.emit(
        q,
        &plan,
        WILDCARD,
        format_args!("cpu over threshold, all hosts"),
        format_args!("{}", window.start_string()),
    );
    Ok(())
}

/// As `high-cpu-all-hosts`, restricted to one host drawn independently on every call.
fn high_cpu_1_host(
    ctx: &mut ScenarioContext<'_>,
    q: &mut QueryCarrier,
    scale: usize,
) -> Result<()> {
    let window = ctx.interval.random_window(ctx.rng, DAY)?;
    let host = random_host(ctx.rng, scale)?;

    let plan = QueryPlan {
        window: Some(window),
        filter: Some(Filter {
            combinator: Combinator::And,
            predicates: vec![
                cpu_over_threshold(),
                Predicate {
                    field: HOST_TAG,
                    op: CmpOp::Eq,
                    value: Literal::Host(host),
                },
            ],
        }),
        ..QueryPlan::new("cpu")
    };

    ctx.emit(
        q,
        &plan,
        WILDCARD,
        format_args!("cpu over threshold, rand    1 host"),
        format_args!("{} {}", window.start_string(), host),
    );
    Ok(())
}

/// SELECT * FROM mem
/// WHERE (used_percent > 98.0 OR used < 1000 OR used_percent < 10.0) AND <24h window>
fn mem_or_all_hosts(ctx: &mut ScenarioContext<'_>, q: &mut QueryCarrier, _: usize) -> Result<()> {
    let window = ctx.interval.random_window(ctx.rng, DAY)?;

    let plan = QueryPlan {
        window: Some(window),
        filter: Some(mem_extremes()),
        ..QueryPlan::new("mem")
    };

    ctx.emit(
        q,
        &plan,
        WILDCARD,
        format_args!("mem fields with or, all hosts"),
        format_args!("{}", window.start_string()),
    );
    Ok(())
}

/// `mem-or-all-hosts` plus max(used_percent) by 1h and host.
fn mem_or_by_host(ctx: &mut ScenarioContext<'_>, q: &mut QueryCarrier, _: usize) -> Result<()> {
    let window = ctx.interval.random_window(ctx.rng, DAY)?;

    let plan = QueryPlan {
        selection: Selection::Aggregate {
            func: Aggregate::Max,
            fields: USED_PERCENT,
        },
        window: Some(window),
        filter: Some(mem_extremes()),
        bucketing: Some(Bucketing {
            every: HOUR,
            tag: HOST_TAG,
        }),
        ..QueryPlan::new("mem")
    };

    ctx.emit(
        q,
        &plan,
        "used_percent",
        format_args!("mem fields with or, by host, rand 1day by 1hour"),
        format_args!("{}", window.start_string()),
    );
    Ok(())
}

fn cpu_over_threshold() -> Predicate {
    Predicate {
        field: "usage_user",
        op: CmpOp::Gt,
        value: Literal::Float(CPU_THRESHOLD),
    }
}

fn mem_extremes() -> Filter {
    Filter {
        combinator: Combinator::Or,
        predicates: vec![
            Predicate {
                field: "used_percent",
                op: CmpOp::Gt,
                value: Literal::Float(98.0),
            },
            Predicate {
                field: "used",
                op: CmpOp::Lt,
                value: Literal::Int(1000),
            },
            Predicate {
                field: "used_percent",
                op: CmpOp::Lt,
                value: Literal::Float(10.0),
            },
        ],
    }
}
