//! End-to-end tests against the public `ZoneParser` API, covering the
//! concrete scenarios a zone-file parser is expected to handle correctly.

use std::io::Write;

use zonefile::{Options, ReturnCode, ZoneParser};

fn records(zone: &str, origin: &str) -> Vec<zonefile::Record> {
    let options = Options::new().with_origin(origin);
    ZoneParser::open_str(zone, options)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .expect("zone should parse without error")
}

#[test]
fn a_record_produces_exact_wire_bytes() {
    let recs = records("www 300 IN A 192.0.2.1\n", "example.com.");
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].rdata, vec![192, 0, 2, 1]);
    assert_eq!(recs[0].ttl, 300);
}

#[test]
fn aaaa_record_produces_exact_wire_bytes() {
    let recs = records("www IN AAAA 2001:db8::1\n", "example.com.");
    assert_eq!(recs.len(), 1);
    let mut expected = [0u8; 16];
    expected[0] = 0x20;
    expected[1] = 0x01;
    expected[2] = 0x0d;
    expected[3] = 0xb8;
    expected[15] = 1;
    assert_eq!(recs[0].rdata, expected);
}

#[test]
fn soa_record_produces_exact_wire_bytes() {
    let zone = "@ 3600 IN SOA ns1.example.com. hostmaster.example.com. 2024010100 7200 3600 1209600 3600\n";
    let recs = records(zone, "example.com.");
    assert_eq!(recs.len(), 1);
    let rdata = &recs[0].rdata;
    // mname + rname, each terminated by the root label, followed by five
    // 32-bit integers.
    assert_eq!(rdata.len(), 18 + 22 + 20);
    let serial = u32::from_be_bytes(rdata[rdata.len() - 20..rdata.len() - 16].try_into().unwrap());
    assert_eq!(serial, 2_024_010_100);
}

#[test]
fn label_over_63_octets_is_a_syntax_error() {
    let label = "a".repeat(64);
    let zone = format!("{label}.example.com. IN A 192.0.2.1\n");
    let options = Options::new().with_origin("example.com.");
    let result = ZoneParser::open_str(zone, options).unwrap().collect::<Result<Vec<_>, _>>();
    let err = result.unwrap_err();
    assert_eq!(err.code(), ReturnCode::SyntaxError);
}

#[test]
fn ttl_unit_ordering_rules() {
    assert!(records("a 1m1s IN A 192.0.2.1\n", "example.com.").len() == 1);

    let options = Options::new().with_origin("example.com.");
    assert!(ZoneParser::open_str("a 1m1m IN A 192.0.2.1\n", options).unwrap().collect::<Result<Vec<_>, _>>().is_err());

    let options = Options::new().with_origin("example.com.");
    assert!(ZoneParser::open_str("a 1s1m IN A 192.0.2.1\n", options).unwrap().collect::<Result<Vec<_>, _>>().is_err());
}

#[test]
fn ttl_directive_supplies_the_default() {
    let zone = "$TTL 600\na IN A 192.0.2.1\nb IN A 192.0.2.2\n";
    let recs = records(zone, "example.com.");
    assert_eq!(recs.len(), 2);
    assert!(recs.iter().all(|r| r.ttl == 600));
}

#[test]
fn owner_name_is_inherited_across_lines() {
    let zone = "www 300 IN A 192.0.2.1\n    300 IN A 192.0.2.2\n";
    let recs = records(zone, "example.com.");
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].owner, recs[1].owner);
}

#[test]
fn parenthesised_record_spans_multiple_lines() {
    let zone = "@ IN SOA ns1.example.com. hostmaster.example.com. (\n    2024010100 ; serial\n    7200 ; refresh\n    3600 ; retry\n    1209600 ; expire\n    3600 ; minimum\n)\n";
    let recs = records(zone, "example.com.");
    assert_eq!(recs.len(), 1);
}

#[test]
fn include_of_missing_file_is_not_a_file() {
    let zone = "$INCLUDE /nonexistent/path/to/a/zonefile.zn\n";
    let options = Options::new().with_origin("example.com.");
    let result = ZoneParser::open_str(zone, options).unwrap().collect::<Result<Vec<_>, _>>();
    let err = result.unwrap_err();
    assert_eq!(err.code(), ReturnCode::NotAFile);
}

#[test]
fn circular_include_is_a_semantic_error() {
    let dir = std::env::temp_dir().join(format!("zonefile-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let a = dir.join("a.zn");
    let b = dir.join("b.zn");
    std::fs::write(&a, format!("$INCLUDE {}\n", b.display())).unwrap();
    std::fs::write(&b, format!("$INCLUDE {}\n", a.display())).unwrap();

    let options = Options::new().with_origin("example.com.").with_include_limit(1);
    let result = ZoneParser::open(&a, options).unwrap().collect::<Result<Vec<_>, _>>();
    let err = result.unwrap_err();
    assert_eq!(err.code(), ReturnCode::SemanticError);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn include_limit_of_one_allows_exactly_one_level_of_nesting() {
    let dir = std::env::temp_dir().join(format!("zonefile-test-depth-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let root = dir.join("root.zn");
    let level1 = dir.join("level1.zn");
    let level2 = dir.join("level2.zn");
    std::fs::write(&root, format!("$INCLUDE {}\n", level1.display())).unwrap();
    std::fs::write(&level1, format!("$INCLUDE {}\n", level2.display())).unwrap();
    std::fs::write(&level2, "www IN A 192.0.2.1\n").unwrap();

    let options = Options::new().with_origin("example.com.").with_include_limit(1);
    let result = ZoneParser::open(&root, options).unwrap().collect::<Result<Vec<_>, _>>();
    let err = result.unwrap_err();
    assert_eq!(err.code(), ReturnCode::SemanticError);

    let single = dir.join("single.zn");
    std::fs::write(&single, "www IN A 192.0.2.1\n").unwrap();
    let root_single = dir.join("root_single.zn");
    std::fs::write(&root_single, format!("$INCLUDE {}\n", single.display())).unwrap();
    let options = Options::new().with_origin("example.com.").with_include_limit(1);
    let recs = ZoneParser::open(&root_single, options)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .expect("exactly one level of nesting must be allowed under include_limit=1");
    assert_eq!(recs.len(), 1);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn quoted_string_survives_a_multi_chunk_read() {
    struct SlowReader {
        remaining: Vec<u8>,
    }
    impl std::io::Read for SlowReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = buf.len().min(self.remaining.len()).min(3);
            buf[..n].copy_from_slice(&self.remaining[..n]);
            self.remaining.drain(..n);
            Ok(n)
        }
    }

    let zone = b"a IN TXT \"a long quoted string that spans several read chunks\"\n".to_vec();
    let reader = SlowReader { remaining: zone };
    let options = Options::new().with_origin("example.com.");
    let recs = ZoneParser::open_from_reader(reader, options)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(&recs[0].rdata[1..], b"a long quoted string that spans several read chunks");
}

#[test]
fn unknown_type_requires_generic_rdata_form() {
    let zone = "a IN TYPE65280 \\# 4 DEADBEEF\n";
    let recs = records(zone, "example.com.");
    assert_eq!(recs[0].rdata, vec![0xde, 0xad, 0xbe, 0xef]);
}

#[test]
fn rdata_writes_to_a_temp_file_demonstrate_reader_entry_point() {
    let mut f = tempfile_with_contents(b"a IN A 192.0.2.9\n");
    f.flush().unwrap();
    let options = Options::new().with_origin("example.com.");
    let recs = ZoneParser::open(f.path(), options).unwrap().collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(recs[0].rdata, vec![192, 0, 2, 9]);
}

fn tempfile_with_contents(contents: &[u8]) -> NamedFile {
    let path = std::env::temp_dir().join(format!("zonefile-test-{}.zn", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    NamedFile { path }
}

struct NamedFile {
    path: std::path::PathBuf,
}

impl NamedFile {
    fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Drop for NamedFile {
    fn drop(&mut self) {
        std::fs::remove_file(&self.path).ok();
    }
}
