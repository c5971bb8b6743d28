extern crate gibbsmotif;
extern crate gibbsmotif_io;

use std::sync::Arc;

use gibbsmotif::abc::Dna;
use gibbsmotif::search::Projection;
use gibbsmotif::search::SearchParams;
use gibbsmotif::seq::SequenceSet;
use gibbsmotif::sweep::Sweep;
use gibbsmotif::sweep::SweepConfig;
use gibbsmotif_io::table::DegeneratePolicy;

fn sweep(projection: Projection) -> String {
    let sequences = SequenceSet::<Dna>::encode([
        "TTGACATATAATGCATCG",
        "GCTTGACATATAATCCGA",
        "ATTGACAGCTATAATCAG",
        "CGATTTGACATTATAATG",
    ])
    .unwrap()
    .unwrap();
    let mut config = SweepConfig::new(2, 5, 7);
    config.search = SearchParams::new(100, 100, projection);
    config.seed = Some(7);
    let table = Sweep::new(config, Arc::new(sequences))
        .unwrap()
        .run()
        .unwrap();
    let mut out = Vec::new();
    gibbsmotif_io::table::write(&mut out, &table, DegeneratePolicy::Sentinel).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn positions_table() {
    let text = sweep(Projection::Positions);
    let rows = text.lines().collect::<Vec<_>>();
    assert_eq!(rows.len(), 4);
    for row in &rows[..3] {
        assert_eq!(row.split(',').count(), 4);
    }
    let bookkeeping = rows[3].split(',').collect::<Vec<_>>();
    assert_eq!(bookkeeping.len(), 4);
    assert_eq!(&bookkeeping[1..], &["5", "7", "-1"]);
}

#[test]
fn consensus_table() {
    let text = sweep(Projection::Consensus);
    let rows = text.lines().collect::<Vec<_>>();
    assert_eq!(rows.len(), 4);
    for (row, width) in rows[..3].iter().zip(5..) {
        assert!(*row == "-1" || row.len() == width);
    }
    let bookkeeping = rows[3].split(',').collect::<Vec<_>>();
    assert_eq!(&bookkeeping[1..], &["5", "7"]);
}
