use std::fmt;

use crate::{
    acceptance::{Acceptance, BlockDistance, IncrementalCheck},
    apportion::Combination,
    capacity::theoretic_key_rate,
    encodings::{CapacityBound, CheckCounter, number_of_encodings},
    error::{ConfigError, PreconditionViolation},
    oracle::{BinomialOracle, StatrsBinomial},
    radius::{max_block_errors, prefix_radii},
    strategy::{CodeGenerationStrategy, IndicesToEncodeStrategy, LinearCodeFormat, PruningStrategy},
};

/// Column names of [`Config::cfg_row`].
pub const CFG_HEADER: [&str; 13] = [
    "base",
    "key_length",
    "block_length",
    "num_blocks",
    "p_err",
    "success_rate",
    "max_candidates_num",
    "max_num_indices_to_encode",
    "code_generation_strategy",
    "pruning_strategy",
    "upper_threshold",
    "sparsity",
    "theoretic_key_rate",
];

/// Parameters of one reconciliation setting together with the thresholds
/// derived from them. Built once by [`ConfigBuilder`] and read-only after.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    base: u64,
    hash_base: Option<u64>,
    block_length: usize,
    block_length_hash_base: usize,
    num_blocks: usize,
    key_length: usize,
    p_err: f64,
    success_rate: f64,
    combination: Combination,
    acceptance: Acceptance,
    theoretic_key_rate: f64,
    max_candidates_num: usize,
    max_num_indices_to_encode: usize,
    indices_to_encode_strategy: IndicesToEncodeStrategy,
    code_generation_strategy: CodeGenerationStrategy,
    pruning_strategy: PruningStrategy,
    linear_code_format: LinearCodeFormat,
    full_rank_encoding: bool,
    use_zeroes_in_encoding_matrix: bool,
    sparsity: Option<usize>,
    upper_threshold: Option<usize>,
    number_of_encodings_list: Option<Vec<u64>>,
}

pub struct ConfigBuilder {
    base: u64,
    block_length: usize,
    num_blocks: usize,
    hash_base: Option<u64>,
    p_err: f64,
    success_rate: f64,
    radius: Option<usize>,
    prefix_radii: Option<Vec<usize>>,
    combination: Combination,
    max_candidates_num: Option<usize>,
    max_num_indices_to_encode: Option<usize>,
    indices_to_encode_strategy: IndicesToEncodeStrategy,
    code_generation_strategy: CodeGenerationStrategy,
    pruning_strategy: PruningStrategy,
    linear_code_format: LinearCodeFormat,
    full_rank_encoding: bool,
    use_zeroes_in_encoding_matrix: bool,
    sparsity: Option<usize>,
    upper_threshold: Option<usize>,
    fixed_number_of_encodings: bool,
}

impl Config {
    /// Starts a configuration for a `base`-ary key of `num_blocks` blocks of
    /// `block_length` symbols. Defaults to an error-free channel.
    #[inline]
    pub fn builder(base: u64, block_length: usize, num_blocks: usize) -> ConfigBuilder {
        ConfigBuilder {
            base,
            block_length,
            num_blocks,
            hash_base: None,
            p_err: 0.0,
            success_rate: 1.0,
            radius: None,
            prefix_radii: None,
            combination: Combination::Product,
            max_candidates_num: None,
            max_num_indices_to_encode: None,
            indices_to_encode_strategy: IndicesToEncodeStrategy::AllMultiCandidateBlocks,
            code_generation_strategy: CodeGenerationStrategy::Linear,
            pruning_strategy: PruningStrategy::RadiiProbabilities,
            linear_code_format: LinearCodeFormat::Matrix,
            full_rank_encoding: true,
            use_zeroes_in_encoding_matrix: true,
            sparsity: None,
            upper_threshold: None,
            fixed_number_of_encodings: false,
        }
    }
}

impl ConfigBuilder {
    #[inline]
    pub fn hash_base(mut self, hash_base: u64) -> Self {
        self.hash_base = Some(hash_base);
        self
    }

    #[inline]
    pub fn p_err(mut self, p_err: f64) -> Self {
        self.p_err = p_err;
        self
    }

    #[inline]
    pub fn success_rate(mut self, success_rate: f64) -> Self {
        self.success_rate = success_rate;
        self
    }

    /// Forces a fixed radius for every block.
    #[inline]
    pub fn radius(mut self, radius: usize) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Replaces the computed cumulative radii.
    #[inline]
    pub fn prefix_radii(mut self, prefix_radii: Vec<usize>) -> Self {
        self.prefix_radii = Some(prefix_radii);
        self
    }

    #[inline]
    pub fn combination(mut self, combination: Combination) -> Self {
        self.combination = combination;
        self
    }

    #[inline]
    pub fn max_candidates_num(mut self, max_candidates_num: usize) -> Self {
        self.max_candidates_num = Some(max_candidates_num);
        self
    }

    #[inline]
    pub fn max_num_indices_to_encode(mut self, max_num_indices_to_encode: usize) -> Self {
        self.max_num_indices_to_encode = Some(max_num_indices_to_encode);
        self
    }

    #[inline]
    pub fn indices_to_encode_strategy(mut self, strategy: IndicesToEncodeStrategy) -> Self {
        self.indices_to_encode_strategy = strategy;
        self
    }

    #[inline]
    pub fn code_generation_strategy(mut self, strategy: CodeGenerationStrategy) -> Self {
        self.code_generation_strategy = strategy;
        self
    }

    #[inline]
    pub fn pruning_strategy(mut self, strategy: PruningStrategy) -> Self {
        self.pruning_strategy = strategy;
        self
    }

    #[inline]
    pub fn linear_code_format(mut self, format: LinearCodeFormat) -> Self {
        self.linear_code_format = format;
        self
    }

    #[inline]
    pub fn full_rank_encoding(mut self, full_rank_encoding: bool) -> Self {
        self.full_rank_encoding = full_rank_encoding;
        self
    }

    /// Ignored for binary keys, whose encoding matrices always use zeroes.
    #[inline]
    pub fn use_zeroes_in_encoding_matrix(mut self, use_zeroes: bool) -> Self {
        self.use_zeroes_in_encoding_matrix = use_zeroes;
        self
    }

    #[inline]
    pub fn sparsity(mut self, sparsity: usize) -> Self {
        self.sparsity = Some(sparsity);
        self
    }

    #[inline]
    pub fn upper_threshold(mut self, upper_threshold: usize) -> Self {
        self.upper_threshold = Some(upper_threshold);
        self
    }

    /// Precomputes the per-block parity-check counts.
    #[inline]
    pub fn fixed_number_of_encodings(mut self, fixed: bool) -> Self {
        self.fixed_number_of_encodings = fixed;
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        self.build_with(&StatrsBinomial, &CapacityBound)
    }

    pub fn build_with<O, C>(self, oracle: &O, counter: &C) -> Result<Config, ConfigError>
    where
        O: BinomialOracle,
        C: CheckCounter,
    {
        if self.base < 2 {
            return Err(ConfigError::BaseTooSmall(self.base));
        }
        if let Some(hash_base) = self.hash_base {
            if hash_base < 2 {
                return Err(ConfigError::HashBaseTooSmall(hash_base));
            }
        }
        if self.block_length == 0 {
            return Err(ConfigError::ZeroBlockLength);
        }
        if self.num_blocks == 0 {
            return Err(ConfigError::ZeroBlocks);
        }
        if !(0.0..=1.0).contains(&self.p_err) {
            return Err(ConfigError::ErrorProbabilityOutOfRange(self.p_err));
        }
        if !(self.success_rate > 0.0 && self.success_rate <= 1.0) {
            return Err(ConfigError::SuccessRateOutOfRange(self.success_rate));
        }
        if self.prefix_radii.is_some() {
            if self.radius.is_some() {
                return Err(ConfigError::ConflictingOverrides("fixed radius and prefix radii"));
            }
            if self.p_err == 0.0 {
                return Err(ConfigError::ConflictingOverrides("prefix radii on an error-free channel"));
            }
        }

        let num_blocks: usize = self.num_blocks;
        let block_length: usize = self.block_length;

        let acceptance: Acceptance = match (self.radius, self.p_err == 0.0) {
            (Some(radius), _) => Acceptance::Fixed { radius },
            (None, true) => Acceptance::Fixed { radius: 0 },
            (None, false) => {
                let max_block_error: Vec<usize> = max_block_errors(
                    oracle,
                    block_length,
                    num_blocks,
                    self.p_err,
                    self.success_rate,
                    self.combination,
                )?
                .into_iter()
                .map(|r| r as usize)
                .collect();
                let prefix_radii: Vec<usize> = match self.prefix_radii {
                    Some(radii) => validate_prefix_radii(radii, num_blocks)?,
                    None => prefix_radii(oracle, block_length, num_blocks, self.p_err, self.success_rate)?
                        .into_iter()
                        .map(|r| r as usize)
                        .collect(),
                };
                Acceptance::Adaptive {
                    max_block_error,
                    prefix_radii,
                }
            }
        };

        let key_length: usize = block_length * num_blocks;
        let block_length_hash_base: usize = match self.hash_base {
            Some(hash_base) => {
                ((block_length as f64) * (hash_base as f64).log2() / (self.base as f64).log2()).ceil() as usize
            }
            None => block_length,
        };
        let theoretic_key_rate: f64 = theoretic_key_rate(self.base, self.p_err)?;
        let number_of_encodings_list: Option<Vec<u64>> = if self.fixed_number_of_encodings {
            Some(number_of_encodings(
                counter,
                key_length,
                self.base,
                self.p_err,
                num_blocks,
            )?)
        } else {
            None
        };

        match &acceptance {
            Acceptance::Fixed { radius } => tracing::debug!(
                base = self.base,
                block_length,
                num_blocks,
                p_err = self.p_err,
                radius,
                theoretic_key_rate,
                "built fixed-radius configuration"
            ),
            Acceptance::Adaptive {
                max_block_error,
                prefix_radii,
            } => tracing::debug!(
                base = self.base,
                block_length,
                num_blocks,
                p_err = self.p_err,
                success_rate = self.success_rate,
                combination = %self.combination,
                ?max_block_error,
                ?prefix_radii,
                theoretic_key_rate,
                "built adaptive configuration"
            ),
        }

        Ok(Config {
            base: self.base,
            hash_base: self.hash_base,
            block_length,
            block_length_hash_base,
            num_blocks,
            key_length,
            p_err: self.p_err,
            success_rate: self.success_rate,
            combination: self.combination,
            acceptance,
            theoretic_key_rate,
            max_candidates_num: self.max_candidates_num.unwrap_or(block_length * block_length),
            max_num_indices_to_encode: self.max_num_indices_to_encode.unwrap_or(num_blocks),
            indices_to_encode_strategy: self.indices_to_encode_strategy,
            code_generation_strategy: self.code_generation_strategy,
            pruning_strategy: self.pruning_strategy,
            linear_code_format: self.linear_code_format,
            full_rank_encoding: self.full_rank_encoding,
            use_zeroes_in_encoding_matrix: self.use_zeroes_in_encoding_matrix || self.base == 2,
            sparsity: self.sparsity,
            upper_threshold: self.upper_threshold,
            number_of_encodings_list,
        })
    }
}

fn validate_prefix_radii(radii: Vec<usize>, num_blocks: usize) -> Result<Vec<usize>, ConfigError> {
    if radii.len() != num_blocks {
        return Err(ConfigError::PrefixRadiiLength {
            expected: num_blocks,
            got: radii.len(),
        });
    }
    if let Some(i) = radii.windows(2).position(|w| w[1] < w[0]) {
        return Err(ConfigError::PrefixRadiiDecreasing(i + 1));
    }
    Ok(radii)
}

impl Config {
    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn hash_base(&self) -> Option<u64> {
        self.hash_base
    }

    pub fn block_length(&self) -> usize {
        self.block_length
    }

    /// Block length expressed in hash-base symbols.
    pub fn block_length_hash_base(&self) -> usize {
        self.block_length_hash_base
    }

    pub fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    pub fn key_length(&self) -> usize {
        self.key_length
    }

    pub fn p_err(&self) -> f64 {
        self.p_err
    }

    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }

    pub fn combination(&self) -> Combination {
        self.combination
    }

    pub fn acceptance(&self) -> &Acceptance {
        &self.acceptance
    }

    pub fn fixed_radius(&self) -> bool {
        self.acceptance.is_fixed()
    }

    /// The uniform radius, in fixed-radius mode.
    pub fn radius(&self) -> Option<usize> {
        match &self.acceptance {
            Acceptance::Fixed { radius } => Some(*radius),
            Acceptance::Adaptive { .. } => None,
        }
    }

    /// Per-block radii, in adaptive mode.
    pub fn max_block_error(&self) -> Option<&[usize]> {
        match &self.acceptance {
            Acceptance::Fixed { .. } => None,
            Acceptance::Adaptive { max_block_error, .. } => Some(max_block_error),
        }
    }

    /// Cumulative radii, in adaptive mode.
    pub fn prefix_radii(&self) -> Option<&[usize]> {
        match &self.acceptance {
            Acceptance::Fixed { .. } => None,
            Acceptance::Adaptive { prefix_radii, .. } => Some(prefix_radii),
        }
    }

    pub fn theoretic_key_rate(&self) -> f64 {
        self.theoretic_key_rate
    }

    pub fn max_candidates_num(&self) -> usize {
        self.max_candidates_num
    }

    pub fn max_num_indices_to_encode(&self) -> usize {
        self.max_num_indices_to_encode
    }

    pub fn indices_to_encode_strategy(&self) -> IndicesToEncodeStrategy {
        self.indices_to_encode_strategy
    }

    pub fn code_generation_strategy(&self) -> CodeGenerationStrategy {
        self.code_generation_strategy
    }

    pub fn pruning_strategy(&self) -> PruningStrategy {
        self.pruning_strategy
    }

    pub fn linear_code_format(&self) -> LinearCodeFormat {
        self.linear_code_format
    }

    pub fn full_rank_encoding(&self) -> bool {
        self.full_rank_encoding
    }

    pub fn use_zeroes_in_encoding_matrix(&self) -> bool {
        self.use_zeroes_in_encoding_matrix
    }

    pub fn sparsity(&self) -> Option<usize> {
        self.sparsity
    }

    pub fn upper_threshold(&self) -> Option<usize> {
        self.upper_threshold
    }

    /// Per-block parity-check counts, when requested at build time.
    pub fn number_of_encodings_list(&self) -> Option<&[u64]> {
        self.number_of_encodings_list.as_deref()
    }

    /// Radius applying to block `block_index` on its own.
    pub fn determine_cur_radius(&self, block_index: usize) -> Result<usize, PreconditionViolation> {
        let out_of_range = || PreconditionViolation::BlockIndexOutOfRange {
            index: block_index,
            num_blocks: self.num_blocks,
        };
        if block_index >= self.num_blocks {
            return Err(out_of_range());
        }
        self.acceptance.block_radius(block_index).ok_or_else(out_of_range)
    }

    /// Full validation of candidate `x` against `y` on their common blocks.
    pub fn is_within_radius_all_blocks<B, D>(&self, metric: &D, x: &[B], y: &[B]) -> Result<bool, PreconditionViolation>
    where
        D: BlockDistance<B>,
    {
        self.check_span(x, y)?;
        self.acceptance.all_blocks(metric, x, y)
    }

    /// Validation of the newest block only. Callers must extend a candidate
    /// one block at a time; see [`IncrementalCheck`] for an enforcing cursor.
    pub fn is_within_radius_new_block<B, D>(&self, metric: &D, x: &[B], y: &[B]) -> Result<bool, PreconditionViolation>
    where
        D: BlockDistance<B>,
    {
        self.check_span(x, y)?;
        self.acceptance.new_block(metric, x, y)
    }

    /// [`Self::is_within_radius_new_block`] through an order-enforcing cursor.
    pub fn push_block<B, D>(
        &self,
        check: &mut IncrementalCheck,
        metric: &D,
        x: &[B],
        y: &[B],
    ) -> Result<bool, PreconditionViolation>
    where
        D: BlockDistance<B>,
    {
        self.check_span(x, y)?;
        check.push(&self.acceptance, metric, x, y)
    }

    fn check_span<B>(&self, x: &[B], y: &[B]) -> Result<(), PreconditionViolation> {
        let k: usize = x.len().min(y.len());
        if k > self.num_blocks {
            return Err(PreconditionViolation::TooManyBlocks {
                got: k,
                max: self.num_blocks,
            });
        }
        Ok(())
    }

    /// Values for [`CFG_HEADER`], as the result rows tag them.
    pub fn cfg_row(&self) -> Vec<String> {
        fn opt(v: Option<usize>) -> String {
            v.map_or_else(|| "None".to_string(), |v| v.to_string())
        }
        vec![
            self.base.to_string(),
            self.key_length.to_string(),
            self.block_length.to_string(),
            self.num_blocks.to_string(),
            self.p_err.to_string(),
            self.success_rate.to_string(),
            self.max_candidates_num.to_string(),
            self.max_num_indices_to_encode.to_string(),
            self.code_generation_strategy.to_string(),
            self.pruning_strategy.to_string(),
            opt(self.upper_threshold),
            opt(self.sparsity),
            self.theoretic_key_rate.to_string(),
        ]
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cfg: ")?;
        for (i, (key, val)) in CFG_HEADER.iter().zip(self.cfg_row()).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}={val}")?;
        }
        Ok(())
    }
}
