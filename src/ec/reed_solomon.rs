//! Reed-Solomon coding over GF(256) as used by QR codes.
//!
//! Codewords are stored highest power first: `c[0]` is the coefficient of
//! `x^(n-1)`. The generator polynomial has roots alpha^0 .. alpha^(ec-1).

use super::gf256::{Gf256, GfPoly};
use thiserror::Error;

/// Why a block could not be corrected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RsError {
    #[error("{found} errors exceed the correction capacity of {capacity}")]
    TooManyErrors { found: usize, capacity: usize },
    #[error("error locator degree does not match its number of roots")]
    LocatorMismatch,
    #[error("error position outside the codeword")]
    BadErrorLocation,
    #[error("euclidean algorithm failed to converge")]
    EuclideanFailed,
    #[error("syndromes still non-zero after correction")]
    ResidualSyndrome,
}

/// Computes parity codewords for data blocks
pub struct ReedSolomonEncoder {
    /// Generator coefficients, leading 1 first
    generator: Vec<u8>,
}

impl ReedSolomonEncoder {
    pub fn new(num_ecc_codewords: usize) -> Self {
        let mut generator = GfPoly::one();
        for i in 0..num_ecc_codewords {
            generator = generator.multiply(&GfPoly::new(&[1, Gf256::exp(i)]));
        }
        Self {
            generator: generator.coefficients().to_vec(),
        }
    }

    pub fn num_ecc_codewords(&self) -> usize {
        self.generator.len() - 1
    }

    /// Parity bytes for `data`: the remainder of `data * x^ec` divided by the generator
    pub fn encode(&self, data: &[u8]) -> Vec<u8> {
        let ec = self.num_ecc_codewords();
        let mut remainder = vec![0u8; ec];
        if ec == 0 {
            return remainder;
        }
        for &d in data {
            let factor = d ^ remainder[0];
            remainder.rotate_left(1);
            remainder[ec - 1] = 0;
            for (r, &g) in remainder.iter_mut().zip(&self.generator[1..]) {
                *r ^= Gf256::mul(g, factor);
            }
        }
        remainder
    }
}

/// Reed-Solomon decoder for QR codes
pub struct ReedSolomonDecoder {
    num_ecc_codewords: usize,
}

impl ReedSolomonDecoder {
    pub fn new(num_ecc_codewords: usize) -> Self {
        Self { num_ecc_codewords }
    }

    /// Correct `received` in place. Returns the number of corrected codewords.
    pub fn decode(&self, received: &mut [u8]) -> Result<usize, RsError> {
        let two_s = self.num_ecc_codewords;
        if two_s == 0 {
            return Ok(0);
        }

        let poly = GfPoly::new(received);
        let mut syndrome = vec![0u8; two_s];
        let mut no_error = true;
        for i in 0..two_s {
            let eval = poly.evaluate_at(Gf256::exp(i));
            syndrome[two_s - 1 - i] = eval;
            if eval != 0 {
                no_error = false;
            }
        }
        if no_error {
            return Ok(0);
        }

        let syndrome = GfPoly::new(&syndrome);
        let (sigma, omega) =
            Self::run_euclidean_algorithm(GfPoly::monomial(two_s, 1), syndrome, two_s)?;

        let num_errors = sigma.degree();
        if num_errors > two_s / 2 {
            return Err(RsError::TooManyErrors {
                found: num_errors,
                capacity: two_s / 2,
            });
        }

        let locations = Self::find_error_locations(&sigma)?;
        let magnitudes = Self::find_error_magnitudes(&omega, &locations);
        for (&location, &magnitude) in locations.iter().zip(&magnitudes) {
            let log = Gf256::log(location);
            if log >= received.len() {
                return Err(RsError::BadErrorLocation);
            }
            let position = received.len() - 1 - log;
            received[position] ^= magnitude;
        }

        let check = GfPoly::new(received);
        if (0..two_s).any(|i| check.evaluate_at(Gf256::exp(i)) != 0) {
            return Err(RsError::ResidualSyndrome);
        }

        Ok(num_errors)
    }

    /// Extended Euclid on `x^2t` and the syndrome polynomial, yielding the
    /// error locator sigma and evaluator omega, normalised so sigma(0) = 1.
    fn run_euclidean_algorithm(
        a: GfPoly,
        b: GfPoly,
        r_bound: usize,
    ) -> Result<(GfPoly, GfPoly), RsError> {
        let (a, b) = if a.degree() < b.degree() { (b, a) } else { (a, b) };

        let mut r_last = a;
        let mut r = b;
        let mut t_last = GfPoly::zero();
        let mut t = GfPoly::one();

        while 2 * r.degree() >= r_bound {
            let r_last_last = r_last;
            let t_last_last = t_last;
            r_last = r;
            t_last = t;

            if r_last.is_zero() {
                return Err(RsError::EuclideanFailed);
            }
            r = r_last_last;
            let mut q = GfPoly::zero();
            let denominator_leading_term = r_last.coefficient(r_last.degree());
            let dlt_inverse = Gf256::inverse(denominator_leading_term);
            while r.degree() >= r_last.degree() && !r.is_zero() {
                let degree_diff = r.degree() - r_last.degree();
                let scale = Gf256::mul(r.coefficient(r.degree()), dlt_inverse);
                q = q.add(&GfPoly::monomial(degree_diff, scale));
                r = r.add(&r_last.multiply_by_monomial(degree_diff, scale));
            }

            t = q.multiply(&t_last).add(&t_last_last);

            if r.degree() >= r_last.degree() && !r.is_zero() {
                return Err(RsError::EuclideanFailed);
            }
        }

        let sigma_tilde_at_zero = t.coefficient(0);
        if sigma_tilde_at_zero == 0 {
            return Err(RsError::EuclideanFailed);
        }
        let inverse = Gf256::inverse(sigma_tilde_at_zero);
        Ok((t.scale(inverse), r.scale(inverse)))
    }

    /// Chien search: the inverses of sigma's roots are the error locators alpha^k.
    fn find_error_locations(sigma: &GfPoly) -> Result<Vec<u8>, RsError> {
        let num_errors = sigma.degree();
        if num_errors == 1 {
            return Ok(vec![sigma.coefficient(1)]);
        }
        let mut locations = Vec::with_capacity(num_errors);
        for i in 1..=255u8 {
            if locations.len() >= num_errors {
                break;
            }
            if sigma.evaluate_at(i) == 0 {
                locations.push(Gf256::inverse(i));
            }
        }
        if locations.len() != num_errors {
            return Err(RsError::LocatorMismatch);
        }
        Ok(locations)
    }

    /// Forney's formula with generator base 0
    fn find_error_magnitudes(omega: &GfPoly, locations: &[u8]) -> Vec<u8> {
        locations
            .iter()
            .enumerate()
            .map(|(i, &location)| {
                let xi_inverse = Gf256::inverse(location);
                let denominator = locations
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .fold(1u8, |acc, (_, &other)| {
                        let term = Gf256::mul(other, xi_inverse);
                        Gf256::mul(acc, 1 ^ term)
                    });
                if denominator == 0 {
                    return 0;
                }
                Gf256::mul(omega.evaluate_at(xi_inverse), Gf256::inverse(denominator))
            })
            .collect()
    }
}
