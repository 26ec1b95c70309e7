use crate::model::{Instrument, InstrumentDto};

/// Field-by-field conversion between `Instrument` and `InstrumentDto`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstrumentMapper;

impl InstrumentMapper {
    pub fn to_dto(&self, instrument: Instrument) -> InstrumentDto {
        InstrumentDto {
            id: instrument.id,
            name: instrument.name,
        }
    }

    pub fn to_entity(&self, dto: InstrumentDto) -> Instrument {
        Instrument {
            id: dto.id,
            name: dto.name,
        }
    }

    pub fn to_dtos(&self, instruments: Vec<Instrument>) -> Vec<InstrumentDto> {
        instruments.into_iter().map(|i| self.to_dto(i)).collect()
    }

    pub fn to_entities(&self, dtos: Vec<InstrumentDto>) -> Vec<Instrument> {
        dtos.into_iter().map(|d| self.to_entity(d)).collect()
    }

    /// Overlay the fields present on `patch` onto `existing`. Absent fields
    /// leave the existing value untouched.
    pub fn partial_update(&self, existing: &mut Instrument, patch: &InstrumentDto) {
        if let Some(id) = patch.id {
            existing.id = Some(id);
        }
        if let Some(name) = &patch.name {
            existing.name = Some(name.clone());
        }
    }
}
