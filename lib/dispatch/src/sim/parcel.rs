use std::fmt;
use feeds::raw::{FromRaw, ParcelRecord};
use crate::Minutes;
use crate::collections::TableKey;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParcelId(pub u32);

impl fmt::Display for ParcelId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl TableKey for ParcelId {
  #[inline]
  fn hash_index(&self, size: usize) -> usize { self.0.hash_index(size) }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ParcelStatus {
  ShippingToHub,
  ArrivedAtHub,
  OutForDelivery,
  DeliveredOnTime,
  DeliveredLate,
}

impl ParcelStatus {
  pub const ALL: [ParcelStatus; 5] = [
    ParcelStatus::ShippingToHub,
    ParcelStatus::ArrivedAtHub,
    ParcelStatus::OutForDelivery,
    ParcelStatus::DeliveredOnTime,
    ParcelStatus::DeliveredLate,
  ];

  #[inline]
  pub fn is_delivered(self) -> bool {
    matches!(self, ParcelStatus::DeliveredOnTime | ParcelStatus::DeliveredLate)
  }

  /// Short machine-readable name.
  pub fn key(self) -> &'static str {
    match self {
      ParcelStatus::ShippingToHub => "shipping_to_hub",
      ParcelStatus::ArrivedAtHub => "at_hub",
      ParcelStatus::OutForDelivery => "out_for_delivery",
      ParcelStatus::DeliveredOnTime => "delivered_on_time",
      ParcelStatus::DeliveredLate => "delivered_late",
    }
  }
}

impl fmt::Display for ParcelStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      ParcelStatus::ShippingToHub => "Shipping to hub",
      ParcelStatus::ArrivedAtHub => "Arrived at hub",
      ParcelStatus::OutForDelivery => "Out for delivery",
      ParcelStatus::DeliveredOnTime => "Delivered on time",
      ParcelStatus::DeliveredLate => "Delivered late",
    };
    f.write_str(s)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
  id: ParcelId,
  address: String,
  pub city: String,
  pub state: String,
  zip: String,
  pub deadline: Minutes,
  pub mass: u32,
  pub notes: String,
  pub status: ParcelStatus,
  pub delivered_at: Option<Minutes>,
  destination_key: String,
}

#[inline]
pub(crate) fn parcel_key(p: &Parcel) -> &ParcelId { &p.id }

pub fn destination_key(address: &str, zip: &str) -> String {
  format!("{} ({})", address, zip)
}

impl Parcel {
  pub fn new(id: ParcelId, address: &str, city: &str, state: &str, zip: &str, deadline: Minutes) -> Self {
    Parcel {
      id,
      address: address.to_string(),
      city: city.to_string(),
      state: state.to_string(),
      zip: zip.to_string(),
      deadline,
      mass: 0,
      notes: String::new(),
      status: ParcelStatus::ArrivedAtHub,
      delivered_at: None,
      destination_key: destination_key(address, zip),
    }
  }

  #[inline]
  pub fn id(&self) -> ParcelId { self.id }

  #[inline]
  pub fn address(&self) -> &str { &self.address }

  #[inline]
  pub fn zip(&self) -> &str { &self.zip }

  /// `"<address> (<zip>)"`, the vertex address this parcel is delivered to.
  #[inline]
  pub fn destination_key(&self) -> &str { &self.destination_key }

  pub fn correct_address(&mut self, address: &str, city: &str, state: &str, zip: &str) {
    self.address = address.to_string();
    self.city = city.to_string();
    self.state = state.to_string();
    self.zip = zip.to_string();
    self.destination_key = destination_key(address, zip);
  }

  /// Mark delivered at `time`, on time if `time <= deadline`.
  pub fn deliver(&mut self, time: Minutes) {
    self.delivered_at = Some(time);
    self.status = if time <= self.deadline {
      ParcelStatus::DeliveredOnTime
    } else {
      ParcelStatus::DeliveredLate
    };
  }
}

impl FromRaw<ParcelRecord> for Parcel {
  fn from_raw(raw: ParcelRecord) -> Self {
    let mut parcel = Parcel::new(ParcelId(raw.id), &raw.address, &raw.city, &raw.state, &raw.zip, raw.deadline);
    parcel.mass = raw.mass;
    parcel.notes = raw.notes;
    parcel
  }
}
