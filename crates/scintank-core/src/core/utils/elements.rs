use phf::phf_map;

/// Static data for one chemical element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub atomic_number: u32,
    pub atomic_mass: f64,
}

/// The elements the material catalog can reference. Masses in g/mol.
static ELEMENTS: phf::Map<&'static str, Element> = phf_map! {
    "H" => Element { atomic_number: 1, atomic_mass: 1.008 },
    "C" => Element { atomic_number: 6, atomic_mass: 12.011 },
    "N" => Element { atomic_number: 7, atomic_mass: 14.007 },
    "O" => Element { atomic_number: 8, atomic_mass: 15.999 },
    "Si" => Element { atomic_number: 14, atomic_mass: 28.085 },
    "Ar" => Element { atomic_number: 18, atomic_mass: 39.948 },
    "Cr" => Element { atomic_number: 24, atomic_mass: 51.996 },
    "Mn" => Element { atomic_number: 25, atomic_mass: 54.938 },
    "Fe" => Element { atomic_number: 26, atomic_mass: 55.845 },
    "Ni" => Element { atomic_number: 28, atomic_mass: 58.693 },
    "Gd" => Element { atomic_number: 64, atomic_mass: 157.25 },
};

/// Looks up an element by symbol.
pub fn element(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.get(symbol)
}
