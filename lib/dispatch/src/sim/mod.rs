//! Time-quantized dispatch simulation: vehicles carry parcels from the hub along
//! greedy routes while management events change what is waiting there.
mod parcel;
mod vehicle;
mod events;
mod simulation;

pub use parcel::{Parcel, ParcelId, ParcelStatus, destination_key};
pub use vehicle::{Vehicle, VehicleId};
pub use events::{EventAction, ManagementEvent, TimeWindow};
pub use simulation::{Checkpoint, Pending, Simulation};
