use num_complex::Complex;
use proptest::prelude::*;
use svbin::{
    ArchiveReader, ArchiveWriter, CodecOptions, Endian, SvbinError, decode, encode,
};

fn c(re: f64, im: f64) -> Complex<f64> {
    Complex::new(re, im)
}

fn bits(z: &Complex<f64>) -> (u64, u64) {
    (z.re.to_bits(), z.im.to_bits())
}

#[test]
fn rank_one_scenario() {
    let elements = [c(1.0, 0.0), c(0.0, 1.0), c(2.0, -1.0)];
    let record = decode(&encode(&[3], &elements, 0.5).unwrap()).unwrap();
    assert_eq!(record.rank(), 1);
    assert_eq!(record.shape(), &[3]);
    assert_eq!(record.elements(), &elements);
    assert_eq!(record.time(), 0.5);
}

#[test]
fn rank_two_keeps_element_order() {
    let elements = [c(1.0, 0.0), c(2.0, 0.0), c(3.0, 0.0), c(4.0, 0.0)];
    let record = decode(&encode(&[2, 2], &elements, 10.0).unwrap()).unwrap();
    assert_eq!(record.shape(), &[2, 2]);
    assert_eq!(record.elements(), &elements);
    assert_eq!(record.get(&[0, 1]), Some(c(2.0, 0.0)));
    assert_eq!(record.get(&[1, 0]), Some(c(3.0, 0.0)));
    assert_eq!(record.time(), 10.0);
}

#[test]
fn truncated_after_rank_is_an_error() {
    let full = encode(&[2, 2], &[c(0.0, 0.0); 4], 0.0).unwrap();
    let err = decode(&full[..4]).unwrap_err();
    assert!(matches!(err, SvbinError::TruncatedStream { .. }), "{err}");
}

#[test]
fn rank_twelve_fails_immediately() {
    let twelve = 12i32.to_ne_bytes();
    assert!(matches!(
        decode(&twelve),
        Err(SvbinError::UnsupportedRank { found: 12, max: 11 })
    ));
}

#[test]
fn raised_max_rank_cannot_admit_rank_twelve() {
    let opts = CodecOptions::default()
        .with_endian(Endian::Little)
        .with_max_rank(12);
    assert!(matches!(
        ArchiveWriter::new(opts).encode(&[1; 12], &[c(1.0, 0.0)], 0.0),
        Err(SvbinError::UnsupportedRank { found: 12, max: 11 })
    ));

    // Rank 12, shape and inner shape all ones, one element, time, step hint.
    let mut bytes = 12i32.to_le_bytes().to_vec();
    for _ in 0..24 {
        bytes.extend(1i32.to_le_bytes());
    }
    for d in [1.0f64, 0.0, 0.0, 1.0] {
        bytes.extend(d.to_le_bytes());
    }
    assert!(matches!(
        ArchiveReader::new(opts).decode(&bytes),
        Err(SvbinError::UnsupportedRank { found: 12, max: 11 })
    ));
}

#[test]
fn rank_eleven_is_supported() {
    let shape = [1, 2, 1, 2, 1, 1, 1, 1, 1, 1, 2];
    let elements: Vec<_> = (0..8).map(|i| c(i as f64, -(i as f64))).collect();
    let record = decode(&encode(&shape, &elements, 7.0).unwrap()).unwrap();
    assert_eq!(record.rank(), 11);
    assert_eq!(record.shape(), &shape);
    assert_eq!(record.elements(), elements.as_slice());
}

#[test]
fn every_truncation_point_fails() {
    let full = encode(&[2, 3], &[c(1.0, 1.0); 6], 1.0).unwrap();
    for cut in 0..full.len() {
        assert!(
            matches!(decode(&full[..cut]), Err(SvbinError::TruncatedStream { .. })),
            "cut at {cut}"
        );
    }
}

#[test]
fn step_hint_is_always_placeholder() {
    let mut source = encode(&[1], &[c(0.0, 0.0)], 0.0).unwrap();
    // Overwrite the stored step hint with something else.
    let n = source.len();
    source[n - 8..].copy_from_slice(&0.125f64.to_ne_bytes());
    let decoded = decode(&source).unwrap();
    assert_eq!(decoded.step_hint(), 0.125);

    let rewritten = decode(&ArchiveWriter::default().encode_record(&decoded).unwrap()).unwrap();
    assert_eq!(rewritten.step_hint(), 1.0);
}

#[test]
fn endian_must_agree() {
    let opts = CodecOptions::default().with_endian(Endian::Big);
    let bytes = ArchiveWriter::new(opts).encode(&[2], &[c(1.0, 2.0); 2], 3.0).unwrap();
    assert!(ArchiveReader::new(opts).decode(&bytes).is_ok());
    let le = ArchiveReader::new(CodecOptions::default().with_endian(Endian::Little));
    assert!(matches!(
        le.decode(&bytes),
        Err(SvbinError::UnsupportedRank { .. })
    ));
}

fn arb_array(
    dims: impl Strategy<Value = Vec<usize>>,
) -> impl Strategy<Value = (Vec<usize>, Vec<Complex<f64>>, f64)> {
    dims.prop_flat_map(|shape| {
        let n = shape.iter().product::<usize>();
        (
            Just(shape),
            prop::collection::vec(
                (any::<f64>(), any::<f64>()).prop_map(|(re, im)| Complex::new(re, im)),
                n,
            ),
            any::<f64>(),
        )
    })
}

proptest! {
    #[test]
    fn roundtrip_any_rank(
        (shape, elements, time) in arb_array(prop::collection::vec(1usize..=2, 1..=11))
    ) {
        let bytes = encode(&shape, &elements, time).unwrap();
        let record = decode(&bytes).unwrap();
        prop_assert_eq!(record.rank(), shape.len());
        prop_assert_eq!(record.shape(), shape.as_slice());
        prop_assert_eq!(record.len(), elements.len());
        prop_assert!(record.elements().iter().zip(&elements).all(|(a, b)| bits(a) == bits(b)));
        prop_assert_eq!(record.time().to_bits(), time.to_bits());
        prop_assert_eq!(record.step_hint(), 1.0);
    }

    #[test]
    fn roundtrip_wider_low_rank(
        (shape, elements, time) in arb_array(prop::collection::vec(1usize..=6, 1..=4))
    ) {
        let opts = CodecOptions::default().with_endian(Endian::Big);
        let bytes = ArchiveWriter::new(opts).encode(&shape, &elements, time).unwrap();
        let record = ArchiveReader::new(opts).decode(&bytes).unwrap();
        prop_assert_eq!(record.shape(), shape.as_slice());
        prop_assert!(record.elements().iter().zip(&elements).all(|(a, b)| bits(a) == bits(b)));
    }

    #[test]
    fn truncated_input_never_decodes(
        (shape, elements, time) in arb_array(prop::collection::vec(1usize..=3, 1..=3)),
        cut in any::<prop::sample::Index>(),
    ) {
        let bytes = encode(&shape, &elements, time).unwrap();
        let cut = cut.index(bytes.len());
        prop_assert!(decode(&bytes[..cut]).is_err());
    }
}
