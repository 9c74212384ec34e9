use smc_types::{PID_SMC_G2_18V15, PID_SMC_G2_18V25, PID_SMC_G2_24V12, PID_SMC_G2_24V19};

/// The settings whose factory value depends on which controller model they're for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ProductDefaults {
    /// Current limit, 0 to 3200.
    pub current_limit: u16,
    pub high_vin_shutoff_mv: u16,
}

// The 24v models use 40V MOSFETs, the 18v models use 30V ones.
const PRODUCT_DEFAULTS: [(u16, ProductDefaults); 4] = [
    (
        PID_SMC_G2_18V15,
        ProductDefaults {
            current_limit: 921,
            high_vin_shutoff_mv: 25000,
        },
    ),
    (
        PID_SMC_G2_24V12,
        ProductDefaults {
            current_limit: 1096,
            high_vin_shutoff_mv: 35000,
        },
    ),
    (
        PID_SMC_G2_18V25,
        ProductDefaults {
            current_limit: 776,
            high_vin_shutoff_mv: 25000,
        },
    ),
    (
        PID_SMC_G2_24V19,
        ProductDefaults {
            current_limit: 1153,
            high_vin_shutoff_mv: 35000,
        },
    ),
];

/// Used for product id 0 (unknown) and anything not in the table.
pub const FALLBACK_DEFAULTS: ProductDefaults = ProductDefaults {
    current_limit: 776,
    high_vin_shutoff_mv: 25000,
};

pub fn product_defaults(product_id: u16) -> ProductDefaults {
    PRODUCT_DEFAULTS
        .iter()
        .find(|(id, _)| *id == product_id)
        .map(|(_, defaults)| *defaults)
        .unwrap_or(FALLBACK_DEFAULTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_products() {
        assert_eq!(product_defaults(0xa3).current_limit, 921);
        assert_eq!(product_defaults(0xa5).current_limit, 1096);
        assert_eq!(product_defaults(0xa7).current_limit, 776);
        assert_eq!(product_defaults(0xa9).current_limit, 1153);
    }

    #[test]
    fn unknown_products_fall_back() {
        assert_eq!(product_defaults(0), FALLBACK_DEFAULTS);
        assert_eq!(product_defaults(0xa1), FALLBACK_DEFAULTS);
        assert_eq!(product_defaults(0xffff), FALLBACK_DEFAULTS);
    }
}
