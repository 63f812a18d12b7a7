pub(crate) mod blur;
pub(crate) mod chain;
pub(crate) mod composite;
pub(crate) mod gate;
pub(crate) mod median;
pub(crate) mod noise;
pub(crate) mod resample;
pub(crate) mod texture;
