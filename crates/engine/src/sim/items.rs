use super::body::Body;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickupKind {
    Star,
    Mushroom,
    Music,
    Goal,
}

impl PickupKind {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Star => "star",
            Self::Mushroom => "mushroom",
            Self::Music => "music",
            Self::Goal => "goal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HazardKind {
    Explode,
    Gas,
}

impl HazardKind {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Explode => "explode",
            Self::Gas => "gas",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub kind: PickupKind,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hazard {
    pub kind: HazardKind,
    pub body: Body,
}
