use chrono::Month;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator, VariantArray};

// ============================================================================
// Products
// ============================================================================

/// Commodities moving through the supply chain, in bill-of-materials order.
///
/// `Vessel` is an accounting product: it measures shipping capacity consumed on a
/// route and never appears on production or storage edges.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumCount,
    VariantArray,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Product {
    Steel,
    Module,
    HalfHull1,
    HalfHull3,
    Foundation,
    Turbine,
    InstalledTurbine,
    Vessel,
}

impl Product {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Everything except the vessel pseudo-product
    pub fn physical() -> impl Iterator<Item = Product> {
        Product::iter().filter(|p| *p != Product::Vessel)
    }

    /// Vessel-equivalents consumed by shipping one unit of this product
    pub fn vessel_share(self) -> f64 {
        match self {
            Product::Steel => 1.0,
            Product::Module => 1.0 / 12.0,
            Product::HalfHull1 => 1.0 / 10.0,
            Product::HalfHull3 => 2.0 / 5.0,
            Product::Foundation => 1.0 / 2.0,
            Product::Turbine => 1.0,
            Product::InstalledTurbine | Product::Vessel => 0.0,
        }
    }
}

/// Fixed-size table with one slot per product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerProduct<T>([T; Product::COUNT]);

impl<T> PerProduct<T> {
    pub fn from_fn(mut f: impl FnMut(Product) -> T) -> Self {
        Self(std::array::from_fn(|i| f(Product::VARIANTS[i])))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Product, &T)> {
        Product::VARIANTS.iter().copied().zip(self.0.iter())
    }

    pub fn map<U>(&self, mut f: impl FnMut(Product, &T) -> U) -> PerProduct<U> {
        PerProduct::from_fn(|p| f(p, &self.0[p.index()]))
    }
}

impl<T: Clone> PerProduct<T> {
    pub fn splat(value: T) -> Self {
        Self::from_fn(|_| value.clone())
    }
}

impl<T: Default> Default for PerProduct<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<Product> for PerProduct<T> {
    type Output = T;

    fn index(&self, product: Product) -> &T {
        &self.0[product.index()]
    }
}

impl<T> IndexMut<Product> for PerProduct<T> {
    fn index_mut(&mut self, product: Product) -> &mut T {
        &mut self.0[product.index()]
    }
}

// ============================================================================
// Planning horizon
// ============================================================================

/// Monthly planning period. The horizon runs November through October.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumCount,
    VariantArray,
)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    November,
    December,
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
}

impl Period {
    pub fn first() -> Period {
        Period::VARIANTS[0]
    }

    /// Position in the planning horizon (0 = November)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn previous(self) -> Option<Period> {
        self.index()
            .checked_sub(1)
            .map(|i| Period::VARIANTS[i])
    }

    pub fn month(self) -> Month {
        match self {
            Period::November => Month::November,
            Period::December => Month::December,
            Period::January => Month::January,
            Period::February => Month::February,
            Period::March => Month::March,
            Period::April => Month::April,
            Period::May => Month::May,
            Period::June => Month::June,
            Period::July => Month::July,
            Period::August => Month::August,
            Period::September => Month::September,
            Period::October => Month::October,
        }
    }

    pub fn from_month(month: Month) -> Period {
        Period::iter()
            .find(|p| p.month() == month)
            .unwrap_or(Period::November)
    }

    /// Calendar month number 1-12
    pub fn from_month_number(number: u8) -> Option<Period> {
        Month::try_from(number).ok().map(Period::from_month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.month().name())
    }
}

// ============================================================================
// Facilities and capabilities
// ============================================================================

/// Production capability of a location. Declaration order is the column order
/// of the facility table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumCount,
    VariantArray,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    ModuleFabrication,
    HalfHull1Fabrication,
    HalfHull3Fabrication,
    FoundationFabrication,
    OffshoreFoundationFabrication,
    TurbineAssembly,
    TurbineInstallation,
}

impl Capability {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Foundation-equivalents are tracked in module units (4 modules per foundation)
    pub fn units_per_whole(self) -> u32 {
        match self {
            Capability::ModuleFabrication => 4,
            _ => 1,
        }
    }
}

/// Facility classification from the facility table
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
pub enum FacilityKind {
    #[strum(to_string = "small_shipyard", serialize = "小型造船所")]
    SmallShipyard,
    #[strum(to_string = "medium_shipyard", serialize = "中型造船所")]
    MediumShipyard,
    #[strum(to_string = "large_shipyard", serialize = "大型造船所")]
    LargeShipyard,
    #[strum(to_string = "base_port", serialize = "基地港湾")]
    BasePort,
    #[strum(to_string = "installation_site", serialize = "設置海域")]
    InstallationSite,
    #[default]
    #[strum(to_string = "unclassified", serialize = "なし", serialize = "なし（仮置のみ）")]
    Unclassified,
}

impl FacilityKind {
    /// Capabilities unlocked by the facility kind alone. Wet storage and at-sea
    /// foundation fabrication come from their own columns.
    pub fn capabilities(self) -> &'static [Capability] {
        use Capability::*;
        match self {
            FacilityKind::SmallShipyard => &[ModuleFabrication, HalfHull1Fabrication],
            FacilityKind::MediumShipyard => &[
                ModuleFabrication,
                HalfHull1Fabrication,
                HalfHull3Fabrication,
            ],
            FacilityKind::LargeShipyard => &[
                ModuleFabrication,
                HalfHull1Fabrication,
                HalfHull3Fabrication,
                FoundationFabrication,
            ],
            FacilityKind::BasePort => &[TurbineAssembly],
            FacilityKind::InstallationSite => &[TurbineInstallation],
            FacilityKind::Unclassified => &[],
        }
    }
}

/// What an edge does, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "capability")]
pub enum EdgeFunction {
    Transport,
    Production(Capability),
    Storage,
}

impl fmt::Display for EdgeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeFunction::Transport => f.write_str("transport"),
            EdgeFunction::Production(capability) => write!(f, "{}", capability),
            EdgeFunction::Storage => f.write_str("storage"),
        }
    }
}

/// Which side of an edge's transformation a flow sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Quantity entering the edge
    Consumed,
    /// Quantity leaving the edge
    Produced,
}
