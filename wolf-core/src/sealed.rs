pub trait Sealed {}

pub trait AadSealed {}

pub trait HmacSealed {}

pub trait KeySealed {}
