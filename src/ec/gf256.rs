//! GF(256) arithmetic with the QR primitive polynomial x^8 + x^4 + x^3 + x^2 + 1 (0x11D)
//! and polynomials over it.

/// GF(256) field operations using log/exp tables
pub struct Gf256;

static LOG_TABLE: [u8; 256] = [
    0, 0, 1, 25, 2, 50, 26, 198, 3, 223, 51, 238, 27, 104, 199, 75, 4, 100, 224, 14, 52, 141, 239,
    129, 28, 193, 105, 248, 200, 8, 76, 113, 5, 138, 101, 47, 225, 36, 15, 33, 53, 147, 142, 218,
    240, 18, 130, 69, 29, 181, 194, 125, 106, 39, 249, 185, 201, 154, 9, 120, 77, 228, 114, 166, 6,
    191, 139, 98, 102, 221, 48, 253, 226, 152, 37, 179, 16, 145, 34, 136, 54, 208, 148, 206, 143,
    150, 219, 189, 241, 210, 19, 92, 131, 56, 70, 64, 30, 66, 182, 163, 195, 72, 126, 110, 107, 58,
    40, 84, 250, 133, 186, 61, 202, 94, 155, 159, 10, 21, 121, 43, 78, 212, 229, 172, 115, 243,
    167, 87, 7, 112, 192, 247, 140, 128, 99, 13, 103, 74, 222, 237, 49, 197, 254, 24, 227, 165,
    153, 119, 38, 184, 180, 124, 17, 68, 146, 217, 35, 32, 137, 46, 55, 63, 209, 91, 149, 188, 207,
    205, 144, 135, 151, 178, 220, 252, 190, 97, 242, 86, 211, 171, 20, 42, 93, 158, 132, 60, 57,
    83, 71, 109, 65, 162, 31, 45, 67, 216, 183, 123, 164, 118, 196, 23, 73, 236, 127, 12, 111, 246,
    108, 161, 59, 82, 41, 157, 85, 170, 251, 96, 134, 177, 187, 204, 62, 90, 203, 89, 95, 176, 156,
    169, 160, 81, 11, 245, 22, 235, 122, 117, 44, 215, 79, 174, 213, 233, 230, 231, 173, 232, 116,
    214, 244, 234, 168, 80, 88, 175,
];

static EXP_TABLE: [u8; 256] = [
    1, 2, 4, 8, 16, 32, 64, 128, 29, 58, 116, 232, 205, 135, 19, 38, 76, 152, 45, 90, 180, 117,
    234, 201, 143, 3, 6, 12, 24, 48, 96, 192, 157, 39, 78, 156, 37, 74, 148, 53, 106, 212, 181,
    119, 238, 193, 159, 35, 70, 140, 5, 10, 20, 40, 80, 160, 93, 186, 105, 210, 185, 111, 222, 161,
    95, 190, 97, 194, 153, 47, 94, 188, 101, 202, 137, 15, 30, 60, 120, 240, 253, 231, 211, 187,
    107, 214, 177, 127, 254, 225, 223, 163, 91, 182, 113, 226, 217, 175, 67, 134, 17, 34, 68, 136,
    13, 26, 52, 104, 208, 189, 103, 206, 129, 31, 62, 124, 248, 237, 199, 147, 59, 118, 236, 197,
    151, 51, 102, 204, 133, 23, 46, 92, 184, 109, 218, 169, 79, 158, 33, 66, 132, 21, 42, 84, 168,
    77, 154, 41, 82, 164, 85, 170, 73, 146, 57, 114, 228, 213, 183, 115, 230, 209, 191, 99, 198,
    145, 63, 126, 252, 229, 215, 179, 123, 246, 241, 255, 227, 219, 171, 75, 150, 49, 98, 196, 149,
    55, 110, 220, 165, 87, 174, 65, 130, 25, 50, 100, 200, 141, 7, 14, 28, 56, 112, 224, 221, 167,
    83, 166, 81, 162, 89, 178, 121, 242, 249, 239, 195, 155, 43, 86, 172, 69, 138, 9, 18, 36, 72,
    144, 61, 122, 244, 245, 247, 243, 251, 235, 203, 139, 11, 22, 44, 88, 176, 125, 250, 233, 207,
    131, 27, 54, 108, 216, 173, 71, 142, 1,
];

impl Gf256 {
    /// Field addition (and subtraction)
    #[inline]
    pub fn add(a: u8, b: u8) -> u8 {
        a ^ b
    }

    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        let log_b = LOG_TABLE[b as usize] as usize;
        EXP_TABLE[(log_a + log_b) % 255]
    }

    /// # Panics
    /// Panics when `b` is zero.
    pub fn div(a: u8, b: u8) -> u8 {
        if b == 0 {
            panic!("Division by zero");
        }
        if a == 0 {
            return 0;
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        let log_b = LOG_TABLE[b as usize] as usize;
        EXP_TABLE[(log_a + 255 - log_b) % 255]
    }

    /// Multiplicative inverse of a non-zero element
    pub fn inverse(a: u8) -> u8 {
        Self::div(1, a)
    }

    /// alpha^n
    #[inline]
    pub fn exp(n: usize) -> u8 {
        EXP_TABLE[n % 255]
    }

    /// Discrete logarithm base alpha of a non-zero element
    ///
    /// # Panics
    /// Panics when `a` is zero.
    #[inline]
    pub fn log(a: u8) -> usize {
        if a == 0 {
            panic!("log(0) is undefined");
        }
        LOG_TABLE[a as usize] as usize
    }

    pub fn pow_usize(a: u8, n: usize) -> u8 {
        if a == 0 {
            return if n == 0 { 1 } else { 0 };
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        let exp = (log_a * (n % 255)) % 255;
        EXP_TABLE[exp]
    }
}

/// Polynomial over GF(256), coefficients from highest to lowest degree.
///
/// Leading zero coefficients are stripped, so the zero polynomial is `[0]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GfPoly {
    coefficients: Vec<u8>,
}

impl GfPoly {
    pub fn new(coefficients: &[u8]) -> Self {
        let first_non_zero = coefficients.iter().position(|&c| c != 0);
        let coefficients = match first_non_zero {
            Some(idx) => coefficients[idx..].to_vec(),
            None => vec![0],
        };
        Self { coefficients }
    }

    pub fn zero() -> Self {
        Self {
            coefficients: vec![0],
        }
    }

    pub fn one() -> Self {
        Self {
            coefficients: vec![1],
        }
    }

    /// `coefficient * x^degree`
    pub fn monomial(degree: usize, coefficient: u8) -> Self {
        if coefficient == 0 {
            return Self::zero();
        }
        let mut coefficients = vec![0u8; degree + 1];
        coefficients[0] = coefficient;
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &[u8] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients[0] == 0
    }

    /// Coefficient of `x^degree`
    pub fn coefficient(&self, degree: usize) -> u8 {
        if degree > self.degree() {
            return 0;
        }
        self.coefficients[self.coefficients.len() - 1 - degree]
    }

    pub fn evaluate_at(&self, a: u8) -> u8 {
        if a == 0 {
            return self.coefficient(0);
        }
        if a == 1 {
            return self.coefficients.iter().fold(0, |acc, &c| acc ^ c);
        }
        self.coefficients
            .iter()
            .fold(0, |acc, &c| Gf256::mul(a, acc) ^ c)
    }

    pub fn add(&self, other: &GfPoly) -> GfPoly {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        let (smaller, larger) = if self.coefficients.len() > other.coefficients.len() {
            (&other.coefficients, &self.coefficients)
        } else {
            (&self.coefficients, &other.coefficients)
        };
        let diff = larger.len() - smaller.len();
        let mut sum = larger.clone();
        for (i, &c) in smaller.iter().enumerate() {
            sum[diff + i] ^= c;
        }
        GfPoly::new(&sum)
    }

    pub fn multiply(&self, other: &GfPoly) -> GfPoly {
        if self.is_zero() || other.is_zero() {
            return GfPoly::zero();
        }
        let a = &self.coefficients;
        let b = &other.coefficients;
        let mut product = vec![0u8; a.len() + b.len() - 1];
        for (i, &ac) in a.iter().enumerate() {
            for (j, &bc) in b.iter().enumerate() {
                product[i + j] ^= Gf256::mul(ac, bc);
            }
        }
        GfPoly::new(&product)
    }

    pub fn scale(&self, scalar: u8) -> GfPoly {
        match scalar {
            0 => GfPoly::zero(),
            1 => self.clone(),
            _ => {
                let scaled: Vec<u8> = self
                    .coefficients
                    .iter()
                    .map(|&c| Gf256::mul(c, scalar))
                    .collect();
                GfPoly::new(&scaled)
            }
        }
    }

    /// `self * coefficient * x^degree`
    pub fn multiply_by_monomial(&self, degree: usize, coefficient: u8) -> GfPoly {
        if coefficient == 0 {
            return GfPoly::zero();
        }
        let mut product: Vec<u8> = self
            .coefficients
            .iter()
            .map(|&c| Gf256::mul(c, coefficient))
            .collect();
        product.resize(product.len() + degree, 0);
        GfPoly::new(&product)
    }
}
