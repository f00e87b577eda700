use super::ids::MaterialId;
use super::properties::PropertyTable;

/// A stoichiometric element entry: symbol plus atom count per formula unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementCount {
    pub symbol: String,
    pub count: u32,
}

/// An element entry specified by mass fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct MassFraction {
    pub symbol: String,
    pub fraction: f64,
}

/// One component of a mixture material.
#[derive(Debug, Clone, PartialEq)]
pub enum MixtureComponent {
    /// A previously registered material, by handle.
    Material(MaterialId),
    /// A bare element, by symbol.
    Element(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MixturePart {
    pub component: MixtureComponent,
    pub mass_fraction: f64,
}

/// How a material's bulk composition is specified.
///
/// Three construction styles: a chemical formula (LAB as C17H27), element
/// mass fractions (air, steel), or a mixture of existing materials and
/// elements (the doped target liquid).
#[derive(Debug, Clone, PartialEq)]
pub enum Composition {
    Elements(Vec<ElementCount>),
    MassFractions(Vec<MassFraction>),
    Mixture(Vec<MixturePart>),
}

/// A named bulk material with density, composition and an optional optical
/// property table.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub density_g_cm3: f64,
    pub composition: Composition,
    pub properties: Option<PropertyTable>,
}

impl Material {
    pub fn new(name: impl Into<String>, density_g_cm3: f64, composition: Composition) -> Self {
        Self {
            name: name.into(),
            density_g_cm3,
            composition,
            properties: None,
        }
    }

    pub fn with_properties(mut self, properties: PropertyTable) -> Self {
        self.properties = Some(properties);
        self
    }
}
