extern crate gibbsmotif;
extern crate rand;
extern crate rand_xoshiro;

use std::collections::HashMap;

use gibbsmotif::abc::Dna;
use gibbsmotif::abc::Nucleotide;
use gibbsmotif::pwm::CountMatrix;
use gibbsmotif::sampler::PositionVector;
use gibbsmotif::sampler::Sampler;
use gibbsmotif::search::search;
use gibbsmotif::search::GibbsSearch;
use gibbsmotif::search::Projection;
use gibbsmotif::search::RunOutcome;
use gibbsmotif::search::SearchParams;
use gibbsmotif::seq::SequenceSet;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

const SHORT: &[&str] = &[
    "ATGCATGCAT",
    "TTGACAGGCA",
    "GGGCCCATAT",
    "ACGTTGCAAC",
    "CATCATGGTA",
];

/// Twelve sequences sharing a run of six guanines in a G-free background.
const CONSERVED: &[&str] = &[
    "AAATACGGGGGG",
    "GGGGGGCTTCAC",
    "CCATCTGGGGGG",
    "CCGGGGGGTCTC",
    "AATGGGGGGTTT",
    "GGGGGGCACAAA",
    "ATGGGGGGAACC",
    "CCCATGGGGGGT",
    "CGGGGGGTCTTT",
    "TGGGGGGCCTCC",
    "TTTCCGGGGGGT",
    "TTTCCGGGGGGC",
];

#[test]
fn short_run_positions() {
    let sequences = SequenceSet::<Dna>::encode(SHORT).unwrap().unwrap();
    let params = SearchParams::new(100, 100, Projection::Positions);
    for seed in 0..10 {
        let rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let result = search(&sequences, 3, params, rng).unwrap();
        assert!(result.best_count <= 100);
        assert!(result.best_count <= result.updates);
        match result.outcome {
            RunOutcome::Positions(positions) => {
                assert_eq!(positions.len(), 5);
                assert!(positions.iter().all(|&p| p <= 7));
            }
            RunOutcome::Degenerate => assert_eq!(result.updates, 0),
            RunOutcome::Consensus(_) => panic!("unexpected consensus"),
        }
    }
}

#[test]
fn tally_counts_successful_recording_steps() {
    let sequences = SequenceSet::<Dna>::encode(SHORT).unwrap().unwrap();
    let params = SearchParams::new(50, 200, Projection::Positions);

    // replay the same chain with a bare sampler
    let rng = Xoshiro256PlusPlus::seed_from_u64(11);
    let mut sampler = Sampler::new(&sequences, 4, rng).unwrap();
    sampler.by_ref().take(params.burn_in).for_each(drop);
    let mut successes = 0;
    let mut seen = HashMap::new();
    for _ in 0..params.recording {
        if sampler.step().start.is_some() {
            successes += 1;
            *seen.entry(sampler.positions().clone()).or_insert(0) += 1;
        }
    }

    let rng = Xoshiro256PlusPlus::seed_from_u64(11);
    let run = GibbsSearch::new(&sequences, 4, params, rng)
        .unwrap()
        .burn_in()
        .record();
    assert_eq!(run.tally().total(), successes);
    assert_eq!(run.tally().len(), seen.len());
    for (positions, count) in run.tally().iter() {
        assert_eq!(seen.get(positions), Some(&count));
    }
    assert_eq!(run.positions(), sampler.positions());
    assert_eq!(run.finish().updates, successes);
}

#[test]
fn conserved_column() {
    let sequences = SequenceSet::<Dna>::encode(CONSERVED).unwrap().unwrap();
    let params = SearchParams::new(200, 200, Projection::Consensus);
    let mut hits = 0;
    for seed in 0..20 {
        let rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let result = search(&sequences, 3, params, rng).unwrap();
        if let RunOutcome::Consensus(motif) = result.outcome {
            if motif[1] == Nucleotide::G {
                hits += 1;
            }
        }
    }
    assert!(hits >= 16, "conserved column recovered in {}/20 runs", hits);
}

#[test]
fn width_equal_to_shortest_length() {
    let sequences = SequenceSet::<Dna>::encode(["ATGCA", "TTGCA", "ATGCATT"])
        .unwrap()
        .unwrap();

    // a single candidate window in the shortest sequences
    let counts = CountMatrix::from_positions(&sequences, &[0, 0, 1], 5, Some(0));
    let profile = counts.to_freq().unwrap();
    let propensities = profile.propensities(&sequences[0]);
    assert_eq!(propensities.len(), 1);
    assert_eq!(propensities[0], 0.0);
    let propensities = profile.propensities(&sequences[1]);
    assert_eq!(propensities.len(), 1);
    assert!(propensities[0] > 0.0);

    let params = SearchParams::new(50, 50, Projection::Positions);
    let rng = Xoshiro256PlusPlus::seed_from_u64(5);
    let result = search(&sequences, 5, params, rng).unwrap();
    match result.outcome {
        RunOutcome::Positions(positions) => {
            assert_eq!(&positions[..2], &[0, 0]);
            assert!(positions[2] <= 2);
        }
        RunOutcome::Degenerate => assert_eq!(result.updates, 0),
        RunOutcome::Consensus(_) => panic!("unexpected consensus"),
    }
}

#[test]
fn consensus_of_identical_windows() {
    let sequences = SequenceSet::<Dna>::encode(["AAGTCA", "GTCAAA", "CGTCAC"])
        .unwrap()
        .unwrap();
    let positions = PositionVector::from(vec![2, 0, 1]);
    let counts = CountMatrix::from_positions(&sequences, &positions, 4, None);
    assert_eq!(counts.consensus().to_string(), "GTCA");
}
