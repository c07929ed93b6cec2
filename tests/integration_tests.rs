use ggh_lattice::utils::{generate_near_orthogonal_basis, generate_random_unimodular, is_hermite_normal_form};
use ggh_lattice::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MESSAGE: [i64; 4] = [3, 5, 7, 9];

fn reference_basis() -> Matrix {
    Matrix::new(vec![
        vec![4, -2, 1, 0],
        vec![0, -1, 5, 2],
        vec![-1, 6, 1, -1],
        vec![0, 1, -1, 6],
    ])
    .unwrap()
}

fn reference_keys() -> LatticeKeyPair {
    LatticeKeyPair::new(Lattice::new(reference_basis()).unwrap()).unwrap()
}

/// `‖B⁻¹e‖∞`, the distance of the noise from the edge of B's rounding region
fn rounding_offset(basis: &Matrix, noise: &LatticeVector) -> f64 {
    RealMatrix::from_integer(basis)
        .inverse()
        .unwrap()
        .mul_vec(noise)
        .unwrap()
        .max_abs()
}

#[test]
fn test_reference_public_basis() {
    let keys = reference_keys();
    assert_eq!(
        keys.public_basis().to_vec(),
        vec![
            vec![1, 0, 0, 0],
            vec![0, 1, 0, 0],
            vec![1, 2, 5, 0],
            vec![20, 119, 80, 152],
        ]
    );
}

#[test]
fn test_round_trip_inside_rounding_region() {
    let keys = reference_keys();
    let b = reference_basis();
    let mut encryptor = Encryptor::seeded(2024);

    let mut recovered = 0;
    for _ in 0..50 {
        let noise = encryptor.sample_noise(4).unwrap();
        let c = encrypt_with_noise(&MESSAGE, keys.public_basis(), &noise).unwrap();
        let x = keys.decrypt(&c).unwrap().to_integer_vec();

        if rounding_offset(&b, &noise) < 0.5 {
            assert_eq!(x, MESSAGE.to_vec(), "in-region noise {} not removed", noise);
        }
        if x == MESSAGE {
            recovered += 1;
        }
    }
    assert!(recovered >= 40, "only {} of 50 recovered", recovered);
}

#[test]
fn test_paths_diverge() {
    let keys = reference_keys();
    let mismatches = (0..10u64)
        .filter(|&seed| {
            let c = Encryptor::seeded(seed).encrypt(&MESSAGE, keys.public_basis()).unwrap();
            let private = keys.decrypt(&c).unwrap().to_integer_vec();
            let public = keys.decrypt_with_public(&c).unwrap().to_integer_vec();
            private != public
        })
        .count();
    assert!(mismatches >= 1);
}

#[test]
fn test_seeded_encryption_is_deterministic() {
    let keys = reference_keys();
    let mut a = Encryptor::seeded(77);
    let mut b = Encryptor::seeded(77);
    let first: Vec<LatticeVector> = (0..3)
        .map(|_| a.encrypt(&MESSAGE, keys.public_basis()).unwrap())
        .collect();
    let second: Vec<LatticeVector> = (0..3)
        .map(|_| b.encrypt(&MESSAGE, keys.public_basis()).unwrap())
        .collect();
    assert_eq!(first, second);
    assert_ne!(first[0], first[1]);

    let mut rng = StdRng::seed_from_u64(77);
    let injected = encrypt_with_rng(&MESSAGE, keys.public_basis(), DEFAULT_NOISE_BOUND, &mut rng).unwrap();
    assert_eq!(injected, first[0]);
}

#[test]
fn test_entropy_runs_differ() {
    let keys = reference_keys();
    let a = Encryptor::new().encrypt(&MESSAGE, keys.public_basis()).unwrap();
    let b = Encryptor::new().encrypt(&MESSAGE, keys.public_basis()).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_noise_norm_matches_bound() {
    let keys = reference_keys();
    let point = LatticeVector::from_integer_vec(&keys.public_basis().mul_vec(&MESSAGE).unwrap());
    for (seed, bound) in [(1u64, 2.0), (2, 0.75), (3, 10.0)] {
        let params = EncryptionParams::seeded(seed).with_noise_bound(bound);
        let c = Encryptor::with_params(params)
            .unwrap()
            .encrypt(&MESSAGE, keys.public_basis())
            .unwrap();
        assert!((c.sub(&point).unwrap().norm() - bound).abs() < 1e-9);
    }
}

#[test]
fn test_generated_keys_round_trip() {
    let mut rng = StdRng::seed_from_u64(99);
    for n in 2..=10 {
        let lattice = generate_near_orthogonal_basis(n, Some(n as u64 * 31)).unwrap();
        let keys = LatticeKeyPair::new(lattice).unwrap();
        assert!(is_hermite_normal_form(keys.public_basis()));

        // diagonal dominance keeps ‖B⁻¹e‖∞ <= ‖e‖∞ < 1/2
        let params = EncryptionParams::seeded(n as u64).with_noise_bound(0.45);
        let mut encryptor = Encryptor::with_params(params).unwrap();
        for _ in 0..10 {
            let message: Vec<i64> = (0..n).map(|_| rng.random_range(-10..=10)).collect();
            let c = encryptor.encrypt(&message, keys.public_basis()).unwrap();
            assert_eq!(keys.decrypt(&c).unwrap().to_integer_vec(), message);
        }
    }
}

#[test]
fn test_large_generated_keys_construct() {
    for n in 8..=12 {
        for seed in 0..20u64 {
            let lattice = generate_near_orthogonal_basis(n, Some(seed)).unwrap();
            let keys = LatticeKeyPair::new(lattice.clone())
                .unwrap_or_else(|e| panic!("n={} seed={}: {}", n, seed, e));
            let h = keys.public_basis();
            assert!(is_hermite_normal_form(h));

            let diagonal: u128 = (0..n).map(|i| *h.get(i, i).unwrap() as u128).product();
            assert_eq!(diagonal, lattice.determinant().unwrap());
        }
    }
}

#[test]
fn test_public_key_independent_of_private_basis_choice() {
    let b = reference_basis();
    let u = generate_random_unimodular(4, 10, Some(5)).unwrap();
    let other = LatticeKeyPair::new(Lattice::new(b.mul(&u).unwrap()).unwrap()).unwrap();
    assert_eq!(other.public_basis(), reference_keys().public_basis());
}

#[test]
fn test_basis_file_round_trip() {
    let path = std::env::temp_dir().join(format!("ggh_basis_{}.json", std::process::id()));
    let lattice = Lattice::new(reference_basis()).unwrap();
    lattice.save_to_file(&path).unwrap();

    let loaded = Lattice::load_from_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded, lattice);
    assert_eq!(
        LatticeKeyPair::new(loaded).unwrap().public_basis(),
        reference_keys().public_basis()
    );
}

#[test]
fn test_invalid_inputs() {
    assert!(matches!(
        LatticeKeyPair::from_rows(vec![vec![1, 2, 3], vec![2, 4, 6], vec![0, 0, 1]]),
        Err(LatticeError::LinearDependence { .. })
    ));
    assert!(matches!(
        LatticeKeyPair::from_rows(vec![vec![1, 2, 3]]),
        Err(LatticeError::DimensionMismatch { .. })
    ));
    assert!(matches!(
        hermite_normal_form(&Matrix::new(vec![vec![0, 0], vec![0, 1]]).unwrap()),
        Err(LatticeError::SingularBasis(_))
    ));

    let keys = reference_keys();
    assert!(matches!(
        Encryptor::seeded(1).encrypt(&[1, 2], keys.public_basis()),
        Err(LatticeError::DimensionMismatch { .. })
    ));
}
