//! Fixture-driven tests against on-disk zone files, in the style of the
//! crate this one is grounded on: each fixture under `test_data/` exercises
//! one parsing concern end to end.

use zonefile::{Options, ZoneParser};

fn parse(fixture: &str) -> Vec<zonefile::Record> {
    ZoneParser::open(format!("test_data/{fixture}"), Options::new())
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .expect("fixture should parse without error")
}

#[test]
fn simple_zone() {
    let recs = parse("simple.zn");
    assert_eq!(recs.len(), 6);

    assert_eq!(recs[0].owner.to_presentation(), "simple.zn.");
    assert_eq!(recs[0].rtype.to_string(), "SOA");
    assert_eq!(recs[0].ttl, 3600);

    assert_eq!(recs[1].owner.to_presentation(), "simple.zn.");
    assert_eq!(recs[1].rtype.to_string(), "NS");
    assert_eq!(recs[2].owner, recs[1].owner);

    assert_eq!(recs[3].owner.to_presentation(), "info.simple.zn.");
    assert_eq!(recs[3].rtype.to_string(), "MX");

    assert_eq!(recs[4].owner.to_presentation(), "mail.simple.zn.");
    assert_eq!(recs[4].rtype.to_string(), "A");
    assert_eq!(recs[4].rdata, vec![1, 2, 3, 4]);

    assert_eq!(recs[5].owner, recs[4].owner);
    assert_eq!(recs[5].rtype.to_string(), "AAAA");
}

#[test]
fn directives_set_origin_and_default_ttl() {
    let recs = parse("directives.zn");
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].ttl, 300);
    assert_eq!(recs[1].ttl, 3600);
    assert_eq!(recs[0].owner.to_presentation(), "simple.zn.");
}

#[test]
fn case_insensitivity_of_class_and_type_mnemonics() {
    let recs = parse("lc_and_uc.zn");
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].rtype.to_string(), "SOA");
    assert_eq!(recs[0].class.to_string(), "IN");
}

#[test]
fn relative_names_qualify_against_origin() {
    let recs = parse("relative.zn");
    assert_eq!(recs.len(), 4);
    assert_eq!(recs[0].owner.to_presentation(), "simple.zn.");
    assert_eq!(recs[1].owner.to_presentation(), "simple.zn.");
    assert_eq!(recs[2].owner.to_presentation(), "info.simple.zn.");
    assert_eq!(recs[3].owner.to_presentation(), "mail.simple.zn.");
}

#[test]
fn brackets_and_comments_are_transparent_to_the_record() {
    let recs = parse("brackets_and_comments.zn");
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].rtype.to_string(), "SOA");
}

#[test]
fn quoted_strings_each_become_one_character_string() {
    let recs = parse("quotes.zn");
    assert_eq!(recs.len(), 1);
    let rdata = &recs[0].rdata;
    assert_eq!(rdata[0] as usize, "first quote".len());
    assert_eq!(&rdata[1..1 + rdata[0] as usize], b"first quote");
}
