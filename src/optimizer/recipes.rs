//! Bill-of-materials table
//!
//! Each capability is described by the products it consumes and produces (with the
//! multiplier applied to the edge capacity to bound each flow) and the balance
//! equations linking them. Any (product, side) pair not listed is fixed at zero.
//! New product types only need a new row here.

use crate::domain::{Capability, Product, Side};

/// A product entering or leaving a production edge, bounded by
/// `capacity_factor` x edge capacity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Port {
    pub product: Product,
    pub capacity_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub side: Side,
    pub product: Product,
    pub coefficient: f64,
}

/// Linear equality: sum of `lhs` terms = sum of `rhs` terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Balance {
    pub lhs: &'static [Term],
    pub rhs: &'static [Term],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recipe {
    pub consumes: &'static [Port],
    pub produces: &'static [Port],
    pub balances: &'static [Balance],
}

impl Recipe {
    /// Product whose output is charged the capability's unit cost
    pub fn costed_product(&self) -> Product {
        self.produces[0].product
    }

    pub fn ports(&self, side: Side) -> &'static [Port] {
        match side {
            Side::Consumed => self.consumes,
            Side::Produced => self.produces,
        }
    }

    /// Capacity multiplier for a (side, product) pair; `None` means the pair is forbidden
    pub fn capacity_factor(&self, side: Side, product: Product) -> Option<f64> {
        self.ports(side)
            .iter()
            .find(|port| port.product == product)
            .map(|port| port.capacity_factor)
    }
}

const fn port(product: Product, capacity_factor: f64) -> Port {
    Port {
        product,
        capacity_factor,
    }
}

const fn consumed(product: Product, coefficient: f64) -> Term {
    Term {
        side: Side::Consumed,
        product,
        coefficient,
    }
}

const fn produced(product: Product, coefficient: f64) -> Term {
    Term {
        side: Side::Produced,
        product,
        coefficient,
    }
}

static MODULE_FABRICATION: Recipe = Recipe {
    consumes: &[port(Product::Steel, 1.0)],
    produces: &[port(Product::Module, 1.0)],
    balances: &[Balance {
        lhs: &[consumed(Product::Steel, 1.0)],
        rhs: &[produced(Product::Module, 1.0)],
    }],
};

static HALF_HULL_1_FABRICATION: Recipe = Recipe {
    consumes: &[port(Product::Module, 1.0)],
    produces: &[port(Product::HalfHull1, 1.0)],
    balances: &[Balance {
        lhs: &[consumed(Product::Module, 1.0)],
        rhs: &[produced(Product::HalfHull1, 1.0)],
    }],
};

static HALF_HULL_3_FABRICATION: Recipe = Recipe {
    consumes: &[port(Product::Module, 3.0)],
    produces: &[port(Product::HalfHull3, 1.0)],
    balances: &[Balance {
        lhs: &[consumed(Product::Module, 1.0)],
        rhs: &[produced(Product::HalfHull3, 3.0)],
    }],
};

// Half-hulls are paired one to one; a foundation takes half of each pair count.
static FOUNDATION_FABRICATION: Recipe = Recipe {
    consumes: &[port(Product::HalfHull1, 1.0), port(Product::HalfHull3, 1.0)],
    produces: &[port(Product::Foundation, 1.0)],
    balances: &[
        Balance {
            lhs: &[consumed(Product::HalfHull1, 1.0)],
            rhs: &[consumed(Product::HalfHull3, 1.0)],
        },
        Balance {
            lhs: &[
                consumed(Product::HalfHull1, 0.5),
                consumed(Product::HalfHull3, 0.5),
            ],
            rhs: &[produced(Product::Foundation, 1.0)],
        },
    ],
};

static TURBINE_ASSEMBLY: Recipe = Recipe {
    consumes: &[port(Product::Foundation, 1.0)],
    produces: &[port(Product::Turbine, 1.0)],
    balances: &[Balance {
        lhs: &[consumed(Product::Foundation, 1.0)],
        rhs: &[produced(Product::Turbine, 1.0)],
    }],
};

static TURBINE_INSTALLATION: Recipe = Recipe {
    consumes: &[port(Product::Turbine, 1.0)],
    produces: &[port(Product::InstalledTurbine, 1.0)],
    balances: &[Balance {
        lhs: &[consumed(Product::Turbine, 1.0)],
        rhs: &[produced(Product::InstalledTurbine, 1.0)],
    }],
};

pub fn recipe(capability: Capability) -> &'static Recipe {
    match capability {
        Capability::ModuleFabrication => &MODULE_FABRICATION,
        Capability::HalfHull1Fabrication => &HALF_HULL_1_FABRICATION,
        Capability::HalfHull3Fabrication => &HALF_HULL_3_FABRICATION,
        Capability::FoundationFabrication | Capability::OffshoreFoundationFabrication => {
            &FOUNDATION_FABRICATION
        }
        Capability::TurbineAssembly => &TURBINE_ASSEMBLY,
        Capability::TurbineInstallation => &TURBINE_INSTALLATION,
    }
}
