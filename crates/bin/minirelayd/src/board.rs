//! Virtual relay board. Creates the pins in the order the composition
//! layer requires and keeps handles on them for the console.

use std::collections::BTreeMap;
use std::rc::Rc;

use minirelay_adapter_virtual::{VirtualInput, VirtualOutput, VirtualPowerMeter};
use minirelay_app::composition::Peripherals;
use minirelay_domain::error::CompositionError;
use minirelay_domain::id::{InputId, OutputId, SwitchId};

use crate::config::{BoardConfig, ChannelConfig};

/// Handles on the simulated peripherals of every slot.
#[derive(Default)]
pub struct Board {
    outputs: BTreeMap<SwitchId, Rc<VirtualOutput>>,
    inputs: BTreeMap<SwitchId, Rc<VirtualInput>>,
    meters: BTreeMap<SwitchId, Rc<VirtualPowerMeter>>,
}

impl Board {
    /// Create the peripherals of both channels.
    ///
    /// # Errors
    ///
    /// Returns a [`CompositionError`] if the creation order is violated.
    pub fn build(
        config: &BoardConfig,
        metering: bool,
    ) -> Result<(Self, Peripherals), CompositionError> {
        let channels: [(SwitchId, &ChannelConfig); 2] =
            [(SwitchId::new(1), &config.sw1), (SwitchId::new(2), &config.sw2)];
        let mut board = Self::default();

        let mut outputs = Peripherals::builder();
        for (slot, channel) in channels {
            let output = Rc::new(VirtualOutput::new(
                OutputId::new(slot.get() - 1),
                channel.output_pin,
                channel.output_inverted,
            ));
            board.outputs.insert(slot, Rc::clone(&output));
            outputs = outputs.output(slot, || output)?;
        }

        let mut inputs = outputs.inputs();
        for (slot, channel) in channels {
            let input = Rc::new(VirtualInput::new(
                InputId::new(slot.get() - 1),
                channel.input_pin,
                channel.input_inverted,
            ));
            board.inputs.insert(slot, Rc::clone(&input));
            inputs = inputs.input(slot, || input)?;
        }

        let mut meters = inputs.power_meters();
        if metering {
            for (slot, _) in channels {
                let meter = Rc::new(VirtualPowerMeter::default());
                board.meters.insert(slot, Rc::clone(&meter));
                meters = meters.power_meter(slot, || meter)?;
            }
        }

        Ok((board, meters.build()))
    }

    #[must_use]
    pub fn output(&self, slot: SwitchId) -> Option<&Rc<VirtualOutput>> {
        self.outputs.get(&slot)
    }

    #[must_use]
    pub fn input(&self, slot: SwitchId) -> Option<&Rc<VirtualInput>> {
        self.inputs.get(&slot)
    }

    /// Meters with the slot they measure.
    pub fn meters(&self) -> impl Iterator<Item = (SwitchId, &Rc<VirtualPowerMeter>)> {
        self.meters.iter().map(|(slot, meter)| (*slot, meter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minirelay_app::ports::{Input, Output};

    #[test]
    fn should_create_both_channels() {
        let (board, peripherals) = Board::build(&BoardConfig::default(), false).unwrap();
        for slot in [SwitchId::new(1), SwitchId::new(2)] {
            assert!(peripherals.output(slot).is_some());
            assert!(peripherals.input(slot).is_some());
            assert!(peripherals.power_meter(slot).is_none());
        }
        assert_eq!(board.output(SwitchId::new(2)).unwrap().pin(), 15);
        assert_eq!(board.input(SwitchId::new(1)).unwrap().pin(), 13);
        assert_eq!(board.meters().count(), 0);
    }

    #[test]
    fn should_share_handles_with_peripherals() {
        let (board, peripherals) = Board::build(&BoardConfig::default(), true).unwrap();
        let slot = SwitchId::new(1);

        board.input(slot).unwrap().set_level(true);
        assert!(peripherals.input(slot).unwrap().state());

        peripherals.output(slot).unwrap().set_state(true, "test");
        assert!(board.output(slot).unwrap().state());
        assert_eq!(board.meters().count(), 2);
    }
}
