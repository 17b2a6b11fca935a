use crate::domain::Capability;

/// Fractional capacity carry-over for one capability at one location.
///
/// Nominal monthly capacities may be fractional (an annual figure that does not
/// divide evenly by twelve). Each period the nominal value is added to the running
/// remainder, the whole part becomes this period's integer capacity and the
/// leftover fraction moves on to the next period. Over the horizon no capacity is
/// created or lost, only shifted.
#[derive(Debug, Clone, Copy)]
pub struct CarryOver {
    remainder: f64,
    units_per_whole: u32,
}

impl CarryOver {
    pub fn new(units_per_whole: u32) -> Self {
        Self {
            remainder: 0.0,
            units_per_whole,
        }
    }

    /// Module fabrication is nominated in foundation-equivalents but counted in modules
    pub fn for_capability(capability: Capability) -> Self {
        Self::new(capability.units_per_whole())
    }

    pub fn remainder(&self) -> f64 {
        self.remainder
    }

    /// Integer capacity for the next period. An absent nominal value yields zero
    /// and drops any accumulated remainder.
    pub fn take_period(&mut self, nominal: Option<f64>) -> u32 {
        let Some(nominal) = nominal else {
            self.remainder = 0.0;
            return 0;
        };

        let accumulated = self.remainder + nominal.max(0.0);
        let whole = accumulated.floor();
        self.remainder = accumulated - whole;
        (whole as u32).saturating_mul(self.units_per_whole)
    }
}

/// Integer capacities for a sequence of nominal monthly values
pub fn spread(nominal: &[f64], units_per_whole: u32) -> Vec<u32> {
    let mut carry = CarryOver::new(units_per_whole);
    nominal
        .iter()
        .map(|value| carry.take_period(Some(*value)))
        .collect()
}
