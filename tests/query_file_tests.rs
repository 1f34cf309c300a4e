#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use tempfile::NamedTempFile;
    use tsqgen::analyze::QueryFileAnalysis;
    use tsqgen::output::{OutputFormat, QueryReader, QueryWriter};
    use tsqgen::{DevopsGenerator, Dialect, QueryWorker};

    fn worker() -> QueryWorker {
        let start = Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2016, 1, 3, 0, 0, 0).unwrap();
        let generator = DevopsGenerator::new(start, end, Dialect::Ioql).unwrap();
        QueryWorker::seeded(Arc::new(generator), 12)
    }

    #[test]
    fn test_write_and_read_query_file() {
        let temp = NamedTempFile::new().unwrap();
        let path = temp.path().to_str().unwrap();
        let mut worker = worker();
        let names = tsqgen::ScenarioRegistry::devops()
            .unwrap()
            .names()
            .collect::<Vec<_>>();

        let mut writer = QueryWriter::create(path, OutputFormat::Binary, Dialect::Ioql).unwrap();
        let mut written = Vec::new();
        for ordinal in 0..28 {
            let q = worker.generate(ordinal, 50).unwrap();
            writer.write_query(&q).unwrap();
            written.push(q);
        }
        let metadata = writer.finish(&names).unwrap();
        assert_eq!(metadata.total_queries, 28);

        let reader = QueryReader::open(path).unwrap();
        assert_eq!(reader.metadata(), &metadata);
        assert_eq!(reader.queries(), written.as_slice());
        assert_eq!(reader.metadata().scenario_counts.len(), names.len());
        assert!(reader
            .metadata()
            .scenario_counts
            .iter()
            .all(|(_, count)| *count == 2));

        let analysis = QueryFileAnalysis::analyze(&reader);
        assert_eq!(analysis.total_queries, 28);
        // two mem scenarios, plus whatever last-point-per-host drew
        assert!(analysis.namespace_distribution["mem"] >= 4);
        assert_eq!(analysis.wildcard_queries, 8);
    }

    #[test]
    fn test_reader_rejects_garbage() {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), b"definitely not a query file").unwrap();

        assert!(QueryReader::open(temp.path().to_str().unwrap()).is_err());
        assert!(QueryReader::from_bytes(b"abc").is_err());
    }

    #[test]
    fn test_reader_rejects_truncated_frames() {
        let temp = NamedTempFile::new().unwrap();
        let path = temp.path().to_str().unwrap();
        let mut worker = worker();

        let mut writer = QueryWriter::create(path, OutputFormat::Binary, Dialect::Ioql).unwrap();
        let q = worker.generate(0, 4).unwrap();
        writer.write_query(&q).unwrap();
        writer.finish(&["cpu-max-1-host"]).unwrap();

        // drop the first frame byte: frames no longer line up with the trailer
        let data = std::fs::read(path).unwrap();
        assert!(QueryReader::from_bytes(&data[1..]).is_err());
    }

    #[test]
    fn test_text_output_has_no_trailer() {
        let temp = NamedTempFile::new().unwrap();
        let path = temp.path().to_str().unwrap();
        let mut worker = worker();

        let mut writer = QueryWriter::create(path, OutputFormat::Text, Dialect::Ioql).unwrap();
        let q = worker.generate_named("last-point-per-host", 4).unwrap();
        writer.write_query(&q).unwrap();
        writer.finish(&[]).unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            text,
            format!("-- {}\n{}\n\n", q.human_description, q.query)
        );
    }
}
