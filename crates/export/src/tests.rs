#[cfg(test)]
mod statement_tests {
    use chrono::{TimeZone, Utc};
    use fedi_backfill_core::testing::post;

    use crate::{
        count_parameters, encode_batch, encode_post, encode_post_with_attachments, quote,
        render_script, template_declaration, ExportError, PARAMETER_COUNT,
    };

    /// Splits an EXECUTE statement into its top-level parameters.
    fn params(statement: &str) -> Vec<String> {
        let inner = statement
            .strip_prefix("EXECUTE backfill_statuses (")
            .and_then(|s| s.strip_suffix(");"))
            .unwrap();
        let mut out = vec![String::new()];
        let mut in_literal = false;
        for c in inner.chars() {
            match c {
                '\'' => {
                    in_literal = !in_literal;
                    out.last_mut().unwrap().push(c);
                },
                ',' if !in_literal => out.push(String::new()),
                _ => out.last_mut().unwrap().push(c),
            }
        }
        out.into_iter().map(|p| p.trim().to_owned()).collect()
    }

    #[test]
    fn test_template_declares_23_parameters() {
        let template = template_declaration();
        assert!(template.starts_with("PREPARE backfill_statuses AS INSERT INTO statuses (id,uri,text,"));
        assert!(template.contains("$23)"));
        assert!(!template.contains("$24"));
        assert!(template.ends_with(") ON CONFLICT DO NOTHING;"));
        assert!(!template.contains("ON CONFLICT (id)"));
        assert!(template.contains("trendable,ordered_media_attachment_ids)"));
    }

    #[test]
    fn test_encode_root_post() {
        let statement = encode_post(&post("100", None)).unwrap();
        assert_eq!(
            statement,
            "EXECUTE backfill_statuses (100, 'https://source.example/users/alice/statuses/100', \
             '<p>post 100</p>', 1700000000, 1700000000, null, null, 'https://source.example/@alice/100', \
             false, 0, '', false, 'en', null, true, 1, null, null, null, null, null, false, null);"
        );
    }

    #[test]
    fn test_single_quote_is_escaped_and_count_kept() {
        let mut p = post("101", None);
        p.text = "<p>it's Bob's, isn't it</p>".to_owned();
        let statement = encode_post(&p).unwrap();
        assert!(statement.contains("'<p>it''s Bob''s, isn''t it</p>'"));
        assert_eq!(count_parameters(&statement), Some(PARAMETER_COUNT));
        assert_eq!(params(&statement).len(), 23);
    }

    #[test]
    fn test_quote_only_text() {
        assert_eq!(quote("'"), "''''");
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn test_private_visibility_maps_to_two() {
        let mut p = post("102", None);
        p.visibility = "private".to_owned();
        let statement = encode_post(&p).unwrap();
        assert_eq!(params(&statement)[9], "2");
    }

    #[test]
    fn test_unknown_visibility_is_rejected() {
        let mut p = post("103", None);
        p.visibility = "local".to_owned();
        let err = encode_post(&p).unwrap_err();
        assert!(matches!(err, ExportError::Visibility { ref post_id, .. } if post_id == "103"));
        assert!(err.to_string().contains("local"));
    }

    #[test]
    fn test_edited_post_timestamps() {
        let mut p = post("104", None);
        p.edited_at = Some(Utc.timestamp_opt(1_700_000_600, 0).unwrap());
        let params = params(&encode_post(&p).unwrap());
        assert_eq!(params[3], "1700000000");
        assert_eq!(params[4], "1700000600");
        assert_eq!(params[20], "1700000600");
    }

    #[test]
    fn test_unedited_post_has_null_edited_at() {
        let params = params(&encode_post(&post("105", None)).unwrap());
        assert_eq!(params[4], params[3]);
        assert_eq!(params[20], "null");
    }

    #[test]
    fn test_reply_fields() {
        let params = params(&encode_post(&post("106", Some("105"))).unwrap());
        assert_eq!(params[5], "105");
        assert_eq!(params[11], "true");
        assert_eq!(params[17], "1");
    }

    #[test]
    fn test_nullable_text_fields() {
        let mut p = post("107", None);
        p.url = None;
        p.language = None;
        p.spoiler_text = "cw: o'clock".to_owned();
        let params = params(&encode_post(&p).unwrap());
        assert_eq!(params[7], "null");
        assert_eq!(params[12], "null");
        assert_eq!(params[10], "'cw: o''clock'");
    }

    #[test]
    fn test_reblog_reference() {
        let mut p = post("108", None);
        p.reblog_of_id = Some("42".to_owned());
        assert_eq!(params(&encode_post(&p).unwrap())[6], "42");
    }

    #[test]
    fn test_attachments_array_and_empty_null() {
        let mut p = post("109", None);
        p.attachment_ids = vec!["5".to_owned(), "6".to_owned()];
        assert_eq!(params(&encode_post(&p).unwrap())[22], "'{5,6}'");

        let statement = encode_post_with_attachments(&p, &[]).unwrap();
        assert_eq!(params(&statement)[22], "null");
    }

    #[test]
    fn test_non_numeric_id_is_malformed() {
        let err = encode_post(&post("abc", None)).unwrap_err();
        assert!(matches!(err, ExportError::MalformedId { field: "id", .. }));

        let mut p = post("110", None);
        p.attachment_ids = vec!["5); DROP TABLE statuses; --".to_owned()];
        assert!(matches!(
            encode_post(&p).unwrap_err(),
            ExportError::MalformedId { field: "ordered_media_attachment_ids", .. }
        ));
    }

    #[test]
    fn test_count_parameters_shapes() {
        assert_eq!(count_parameters("EXECUTE s (1, 'a,b', 'c''d');"), Some(3));
        assert_eq!(count_parameters("EXECUTE s (1, 'open);"), None);
        assert_eq!(count_parameters("SELECT 1;"), None);
    }

    #[test]
    fn test_batch_continues_past_failures() {
        let mut bad = post("201", None);
        bad.visibility = "circle".to_owned();
        let posts = [post("200", None), bad, post("202", Some("200"))];

        let batch = encode_batch(&posts);
        let encoded: Vec<&str> = batch.statements.iter().map(|s| s.post_id.as_str()).collect();
        assert_eq!(encoded, vec!["200", "202"]);
        assert_eq!(batch.failed_ids().collect::<Vec<_>>(), vec!["201"]);
    }

    #[test]
    fn test_script_has_single_prelude() {
        let statements: Vec<String> =
            [post("1", None), post("2", Some("1"))].iter().map(|p| encode_post(p).unwrap()).collect();
        let script = render_script(&statements);
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.iter().filter(|l| l.starts_with("PREPARE")).count(), 1);
        assert!(lines[0].starts_with("PREPARE"));
        assert!(lines[1].starts_with("EXECUTE backfill_statuses (1,"));
        assert!(lines[2].starts_with("EXECUTE backfill_statuses (2,"));
    }

    #[test]
    fn test_empty_script_is_prelude_only() {
        let script = render_script(&[]);
        assert_eq!(script, format!("{}\n", template_declaration()));
    }
}

#[cfg(test)]
mod sink_tests {
    use tempfile::tempdir;

    use crate::{write_atomic, write_script};

    #[test]
    fn test_write_atomic_creates_and_replaces() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("commands.sql");

        write_atomic(&path, "first\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\n");

        write_atomic(&path, "second\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");

        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1, "temporary file left behind");
    }

    #[test]
    fn test_write_script_includes_prelude() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.sql");
        write_script(&path, &["EXECUTE backfill_statuses (1);".to_owned()]).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("PREPARE backfill_statuses"));
        assert!(written.ends_with("EXECUTE backfill_statuses (1);\n"));
    }

    #[test]
    fn test_write_into_missing_directory_fails_cleanly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.sql");
        assert!(write_atomic(&path, "x").is_err());
        assert!(!path.exists());
    }
}
