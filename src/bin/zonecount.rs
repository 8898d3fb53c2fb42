use std::collections::HashMap;
use std::env;
use std::process::ExitCode;

use zonefile::{Name, Options, RRType, ZoneParser};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let mut origin = "";
    let mut arg_count = 1;

    loop {
        match args[arg_count].as_str() {
            "-o" | "--origin" => {
                origin = &args[arg_count + 1];
                arg_count += 2;
            }
            _ => break,
        }
    }

    if args.len() < 1 + arg_count {
        println!("Usage: zonecount [-o origin] <zonefile>");
        return 10.into();
    }

    if origin == "" {
        origin = &args[arg_count];
    }

    let options = Options::new().with_origin(origin);
    let p = match ZoneParser::open(&args[arg_count], options) {
        Ok(p) => p,
        Err(e) => {
            println!("Could not open zone file: {e}");
            return 20.into();
        }
    };

    let mut rr_count: HashMap<RRType, u32> = HashMap::new();
    let mut rrset_count: HashMap<RRType, u32> = HashMap::new();
    let mut rr_total = 0;
    let mut rrset_total = 0;
    // Count sets by keeping track of last names by rrtype, so we tolerate
    // different sets of different rrtypes to be mixed.
    let mut last_names: HashMap<RRType, Name> = HashMap::new();

    for result in p {
        match result {
            Err(e) => {
                println!("Parse error: {}", e);
                return 255.into();
            }
            Ok(rr) => {
                if let Some(last_name) = last_names.get(&rr.rtype) {
                    if *last_name != rr.owner {
                        *rrset_count.entry(rr.rtype).or_insert(0) += 1;
                        rrset_total += 1;
                        last_names.insert(rr.rtype, rr.owner.clone());
                    }
                } else {
                    last_names.insert(rr.rtype, rr.owner.clone());
                }

                *rr_count.entry(rr.rtype).or_insert(0) += 1;
                rr_total += 1;
            }
        }
    }

    // Count the last rrsets.
    for rrtype in last_names.keys() {
        *rrset_count.entry(*rrtype).or_insert(0) += 1;
        rrset_total += 1;
    }

    println!();
    println!("RR:");
    for (k, v) in &rr_count {
        println!("  {k}: {v}");
    }
    println!("  total: {rr_total}");

    println!();
    println!("RRSet:");
    for (k, v) in &rrset_count {
        println!("  {k}: {v}");
    }
    println!("  total: {rrset_total}");

    0.into()
}
