const PCG32_DEFAULT_STATE: u64 = 0x853c49e6748fea9b;
const PCG32_DEFAULT_STREAM: u64 = 0xda3e39cb94b95bdb;
const PCG32_MULT: u64 = 0x5851f42d4c957f2d;

const DOUBLE_ONE_MINUS_EPSILON: f64 = 1.0 - f64::EPSILON / 2.0;

/// PCG32 generator. Clustering draws from it so that a fixed seed gives the
/// same light positions on every run.
#[derive(Debug, PartialEq, Clone)]
pub struct RNG {
    pub state: u64,
    pub inc: u64,
}

impl RNG {
    pub fn new() -> Self {
        RNG {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }

    pub fn new_sequence(initseq: u64) -> Self {
        let mut r = Self::new();
        r.set_sequence(initseq);
        return r;
    }

    pub fn set_sequence(&mut self, initseq: u64) {
        self.state = 0;
        self.inc = (initseq << 1) | 1;
        self.uniform_uint32();
        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        self.uniform_uint32();
    }

    #[inline]
    pub fn uniform_uint32(&mut self) -> u32 {
        let oldstate: u64 = self.state;
        self.state = oldstate.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);
        let xorshifted: u32 = ((oldstate.wrapping_shr(18) ^ oldstate).wrapping_shr(27)) as u32;
        let rot: u32 = (oldstate.wrapping_shr(59)) as u32;
        return (xorshifted.wrapping_shr(rot))
            | (xorshifted.wrapping_shl(((!rot).wrapping_add(1)) & 31));
    }

    /// Unbiased draw in `[0, b)`.
    pub fn uniform_uint32_threshold(&mut self, b: u32) -> u32 {
        let threshold = (!b).wrapping_add(1) % b;
        loop {
            let r = self.uniform_uint32();
            if r >= threshold {
                return r % b;
            }
        }
    }

    #[inline]
    pub fn uniform_index(&mut self, len: usize) -> usize {
        return self.uniform_uint32_threshold(len as u32) as usize;
    }

    /// Draw in `[0, 1)` with 53 significant bits.
    pub fn uniform_f64(&mut self) -> f64 {
        let hi = (self.uniform_uint32() >> 5) as u64;
        let lo = (self.uniform_uint32() >> 6) as u64;
        let f = ((hi << 26) | lo) as f64 * (1.0 / (1u64 << 53) as f64);
        return DOUBLE_ONE_MINUS_EPSILON.min(f);
    }
}

impl Default for RNG {
    fn default() -> Self {
        Self::new()
    }
}
