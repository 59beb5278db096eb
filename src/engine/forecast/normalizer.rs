// ==========================================
// 比例归一化 (Proportion Normalizer)
// ==========================================
// S = Σ raw
// S > 0  → raw / S
// 否则   → 均匀分布 1/n（n == 0 时输出为空）
// ==========================================

pub struct ProportionNormalizer;

impl ProportionNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, raw: Vec<(String, f64)>) -> Vec<(String, f64)> {
        let n = raw.len();
        if n == 0 {
            return raw;
        }

        let sum: f64 = raw.iter().map(|(_, p)| *p).sum();
        if sum > 0.0 && sum.is_finite() {
            raw.into_iter().map(|(grade, p)| (grade, p / sum)).collect()
        } else {
            let uniform = 1.0 / n as f64;
            raw.into_iter().map(|(grade, _)| (grade, uniform)).collect()
        }
    }
}

impl Default for ProportionNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
