/// Per-model pricing in dollars per million tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub input: f64,
    pub output: f64,
}

/// Default tier used for unrecognized or absent model names (Sonnet pricing).
pub const DEFAULT_PRICING: ModelPricing = ModelPricing {
    input: 3.0,
    output: 15.0,
};

const MODEL_PRICING: &[(&str, ModelPricing)] = &[
    (
        "claude-opus-4-1",
        ModelPricing {
            input: 15.0,
            output: 75.0,
        },
    ),
    (
        "claude-sonnet-4-5",
        ModelPricing {
            input: 3.0,
            output: 15.0,
        },
    ),
    (
        "claude-haiku-4-5",
        ModelPricing {
            input: 1.0,
            output: 5.0,
        },
    ),
    (
        "claude-sonnet-4-20250514",
        ModelPricing {
            input: 3.0,
            output: 15.0,
        },
    ),
    // Older models
    (
        "claude-3-7-sonnet-20250219",
        ModelPricing {
            input: 3.0,
            output: 15.0,
        },
    ),
    (
        "claude-3-5-haiku-20241022",
        ModelPricing {
            input: 0.8,
            output: 4.0,
        },
    ),
];

/// Look up pricing for a model name, falling back to the default tier.
pub fn pricing_for(model: &str) -> ModelPricing {
    MODEL_PRICING
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, p)| *p)
        .unwrap_or(DEFAULT_PRICING)
}

/// Calculate cost in dollars from token counts and an optional model name.
pub fn calculate_cost(input_tokens: u64, output_tokens: u64, model: Option<&str>) -> f64 {
    let pricing = model.map(pricing_for).unwrap_or(DEFAULT_PRICING);
    let input_cost = (input_tokens as f64 / 1_000_000.0) * pricing.input;
    let output_cost = (output_tokens as f64 / 1_000_000.0) * pricing.output;
    input_cost + output_cost
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_model_uses_its_tier() {
        let cost = calculate_cost(1_000_000, 1_000_000, Some("claude-opus-4-1"));
        assert_eq!(cost, 15.0 + 75.0);
    }

    #[test]
    fn unknown_model_falls_back_to_default() {
        let cost = calculate_cost(2_000_000, 0, Some("some-future-model"));
        assert_eq!(cost, 6.0);
    }

    #[test]
    fn absent_model_falls_back_to_default() {
        let cost = calculate_cost(1_000_000, 0, None);
        assert_eq!(cost, DEFAULT_PRICING.input);
    }

    #[test]
    fn zero_tokens_cost_nothing() {
        assert_eq!(calculate_cost(0, 0, Some("claude-haiku-4-5")), 0.0);
    }
}
