#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use tsqgen::query::WILDCARD;
    use tsqgen::scenario::devops::MEASUREMENTS;
    use tsqgen::{DevopsGenerator, Dialect, GenError, QueryWorker};

    const HOUR_NANOS: i64 = 3_600_000_000_000;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap()
    }

    fn worker(dialect: Dialect, seed: u64) -> QueryWorker {
        let end = t0() + chrono::Duration::hours(24);
        let generator = DevopsGenerator::new(t0(), end, dialect).unwrap();
        QueryWorker::seeded(Arc::new(generator), seed)
    }

    /// Host names referenced in a query, in order of appearance.
    fn host_refs(text: &str) -> Vec<String> {
        text.match_indices("host_")
            .map(|(pos, _)| {
                let digits: String = text[pos + 5..]
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                format!("host_{}", digits)
            })
            .collect()
    }

    /// (start, end) of an ioql time condition.
    fn ioql_time_condition(text: &str) -> (i64, i64) {
        let pos = text.find("new_time_condition(").unwrap() + "new_time_condition(".len();
        let rest = &text[pos..];
        let args = &rest[..rest.find(')').unwrap()];
        let mut parts = args.split(',').map(|p| p.trim().parse::<i64>().unwrap());
        (parts.next().unwrap(), parts.next().unwrap())
    }

    #[test]
    fn test_two_hosts_from_fleet_of_four() {
        let mut worker = worker(Dialect::Ioql, 2024);
        let fleet: HashSet<String> = (0..4).map(|i| format!("host_{}", i)).collect();
        let t0_nanos = t0().timestamp_nanos_opt().unwrap();

        for _ in 0..200 {
            let q = worker.generate_named("cpu-max-2-hosts", 4).unwrap();

            let hosts = host_refs(&q.query);
            assert_eq!(hosts.len(), 2, "query: {}", q.query);
            assert_ne!(hosts[0], hosts[1]);
            assert!(hosts.iter().all(|h| fleet.contains(h)));

            let (start, end) = ioql_time_condition(&q.query);
            assert_eq!(end - start, 12 * HOUR_NANOS);
            assert!(start >= t0_nanos);
            assert!(end <= t0_nanos + 24 * HOUR_NANOS);

            assert_eq!(q.namespace, "cpu");
            assert_eq!(q.field, "usage_user");
            assert!(q.query.contains("new_aggregate(60000000000, 'hostname')"));
            assert!(q.query.contains("new_field_condition('OR'"));
            worker.release(q);
        }
    }

    #[test]
    fn test_two_hosts_influxql() {
        let mut worker = worker(Dialect::InfluxQl, 5);

        let q = worker.generate_named("cpu-max-2-hosts", 4).unwrap();
        let hosts = host_refs(&q.query);

        assert_eq!(hosts.len(), 2);
        assert_ne!(hosts[0], hosts[1]);
        assert!(q.query.starts_with("SELECT max(usage_user) FROM cpu WHERE (hostname = 'host_"));
        assert!(q.query.contains(" OR hostname = 'host_"));
        assert!(q.query.ends_with("GROUP BY time(1m),hostname"));
        assert!(q.human_label.starts_with("InfluxQL max cpu"));
    }

    #[test]
    fn test_eight_hosts_need_scale_eight() {
        let mut worker = worker(Dialect::Ioql, 1);

        let err = worker.generate_named("cpu-max-8-hosts", 4).unwrap_err();
        assert_eq!(
            err,
            GenError::InsufficientFleetSize {
                scenario: "cpu-max-8-hosts",
                needed: 8,
                scale: 4,
            }
        );
        assert_eq!(worker.pool().idle(), 1, "carrier returns to the pool on failure");

        let q = worker.generate_named("cpu-max-8-hosts", 8).unwrap();
        let hosts: HashSet<_> = host_refs(&q.query).into_iter().collect();
        assert_eq!(hosts.len(), 8);
    }

    #[test]
    fn test_zero_scale_is_rejected() {
        let mut worker = worker(Dialect::Ioql, 1);
        assert_eq!(
            worker.generate(9, 0).unwrap_err(),
            GenError::InvalidScale(0)
        );
    }

    #[test]
    fn test_window_longer_than_interval() {
        let end = t0() + chrono::Duration::hours(6);
        let generator = Arc::new(DevopsGenerator::new(t0(), end, Dialect::Ioql).unwrap());
        let mut worker = QueryWorker::seeded(generator, 1);

        assert!(matches!(
            worker.generate_named("cpu-max-1-host", 10),
            Err(GenError::InvalidDuration { .. })
        ));
        // no window needed, so the generator keeps working
        assert!(worker.generate_named("last-point-per-host", 10).is_ok());
    }

    #[test]
    fn test_construction_rejects_bad_interval() {
        let err = DevopsGenerator::new(t0(), t0(), Dialect::Ioql).unwrap_err();
        assert!(matches!(err, GenError::InvalidInterval { .. }));
    }

    #[test]
    fn test_construction_rejects_interval_past_2262() {
        let start = Utc.with_ymd_and_hms(2300, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2300, 1, 2, 0, 0, 0).unwrap();

        let err = DevopsGenerator::new(start, end, Dialect::Ioql).unwrap_err();
        assert!(matches!(err, GenError::IntervalOutOfRange { .. }));
    }

    #[test]
    fn test_ioql_time_condition_near_range_end() {
        let start = Utc.with_ymd_and_hms(2262, 4, 10, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2262, 4, 11, 0, 0, 0).unwrap();
        let generator = DevopsGenerator::new(start, end, Dialect::Ioql).unwrap();
        let mut worker = QueryWorker::seeded(Arc::new(generator), 5);
        let start_nanos = start.timestamp_nanos_opt().unwrap();
        let end_nanos = end.timestamp_nanos_opt().unwrap();

        for _ in 0..50 {
            let q = worker.generate_named("cpu-max-1-host", 4).unwrap();
            let (from, to) = ioql_time_condition(&q.query);
            assert_eq!(to - from, 12 * HOUR_NANOS);
            assert!(from >= start_nanos && to <= end_nanos, "query: {}", q.query);
            assert!(!q.query.contains(&i64::MAX.to_string()));
        }
    }

    #[test]
    fn test_last_point_same_seed_same_measurement() {
        let mut a = worker(Dialect::Ioql, 77);
        let mut b = worker(Dialect::Ioql, 77);

        for _ in 0..20 {
            let qa = a.generate_named("last-point-per-host", 10).unwrap();
            let qb = b.generate_named("last-point-per-host", 10).unwrap();
            assert_eq!(qa.namespace, qb.namespace);
            assert_eq!(qa, qb);
        }
    }

    #[test]
    fn test_last_point_covers_catalog_evenly() {
        const DRAWS_PER_SEED: usize = 4_500;
        // chi-square critical value, 8 degrees of freedom, p = 0.001
        const CRITICAL: f64 = 26.124;

        let mut counts: HashMap<String, u64> = HashMap::new();
        for seed in [1, 2] {
            let mut worker = worker(Dialect::Ioql, seed);
            for _ in 0..DRAWS_PER_SEED {
                let q = worker.generate_named("last-point-per-host", 10).unwrap();
                assert_eq!(q.field, WILDCARD);
                assert!(q.query.contains("new_limit_by_field('hostname', 1)"));
                *counts.entry(q.namespace.clone()).or_insert(0) += 1;
                worker.release(q);
            }
        }

        assert_eq!(counts.len(), MEASUREMENTS.len());
        let expected = (2 * DRAWS_PER_SEED) as f64 / MEASUREMENTS.len() as f64;
        let chi2: f64 = counts
            .values()
            .map(|&c| (c as f64 - expected).powi(2) / expected)
            .sum();
        assert!(chi2 < CRITICAL, "chi-square {} over {:?}", chi2, counts);
    }

    #[test]
    fn test_every_scenario_sets_every_attribute() {
        for dialect in [Dialect::Ioql, Dialect::InfluxQl] {
            let mut worker = worker(dialect, 8);
            let names = {
                let end = t0() + chrono::Duration::hours(24);
                DevopsGenerator::new(t0(), end, dialect)
                    .unwrap()
                    .list_scenarios()
            };

            for (ordinal, name) in names.iter().enumerate() {
                let q = worker.generate(ordinal as u64, 32).unwrap();
                assert!(q.is_filled(), "{} left an attribute empty: {:?}", name, q);
                assert_eq!(q.scenario as usize, ordinal);
                assert!(q.human_description.starts_with(&q.human_label));
                worker.release(q);
            }
        }
    }

    #[test]
    fn test_high_cpu_single_host_predicate() {
        let mut worker = worker(Dialect::Ioql, 4);

        let q = worker.generate_named("high-cpu-1-host", 3).unwrap();
        let hosts = host_refs(&q.query);
        assert_eq!(hosts.len(), 1);
        assert!(["host_0", "host_1", "host_2"].contains(&hosts[0].as_str()));
        assert!(q.query.contains("new_field_predicate('usage_user', '>', '90.0'::text)"));
        assert!(q.query.contains("new_field_condition('AND'"));
        assert_eq!(q.field, WILDCARD);

        // a fleet of one always picks host_0
        let q = worker.generate_named("high-cpu-1-host", 1).unwrap();
        assert_eq!(host_refs(&q.query), vec!["host_0"]);
    }

    #[test]
    fn test_mem_or_scan() {
        let mut worker = worker(Dialect::InfluxQl, 4);

        let q = worker.generate_named("mem-or-all-hosts", 1).unwrap();
        assert_eq!(q.namespace, "mem");
        assert_eq!(q.field, WILDCARD);
        assert!(q.query.starts_with(concat!(
            "SELECT * FROM mem WHERE ",
            "(used_percent > 98.0 OR used < 1000 OR used_percent < 10.0) AND time >= '"
        )));

        let q = worker.generate_named("mem-or-by-host", 1).unwrap();
        assert!(q.query.starts_with("SELECT max(used_percent) FROM mem WHERE ("));
        assert!(q.query.ends_with("GROUP BY time(1h),hostname"));
    }

    #[test]
    fn test_mean_cpu_all_hosts_has_no_host_filter() {
        let mut worker = worker(Dialect::Ioql, 4);

        let q = worker.generate_named("cpu-mean-all-hosts", 100).unwrap();
        assert!(host_refs(&q.query).is_empty());
        assert!(q.query.contains("field_condition => NULL"));
        assert!(q.query.contains("new_aggregate(3600000000000, 'hostname')"));
        let (start, end) = ioql_time_condition(&q.query);
        assert_eq!(end - start, 24 * HOUR_NANOS);
    }
}
