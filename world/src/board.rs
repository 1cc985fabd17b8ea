//! Platform slots, platforms and tower sockets.

use std::collections::BTreeMap;

use creep_defence_core::{
    BoardLayout, BoardSnapshot, EntityId, PlatformId, PlatformSnapshot, SlotId, SlotSnapshot,
    SocketRef, Vec3,
};

#[derive(Clone, Debug)]
struct Slot {
    position: Vec3,
    platform: Option<PlatformId>,
}

#[derive(Clone, Debug)]
struct Platform {
    slot: SlotId,
    sockets: Vec<Option<EntityId>>,
}

/// Buildable topology of the map.
#[derive(Debug)]
pub(crate) struct Board {
    slots: Vec<Slot>,
    platforms: BTreeMap<PlatformId, Platform>,
    socket_offsets: Vec<Vec3>,
    max_platforms: u32,
    next_platform_id: u32,
}

impl Board {
    pub(crate) fn new(layout: &BoardLayout) -> Self {
        Self {
            slots: layout
                .slots
                .iter()
                .map(|&position| Slot {
                    position,
                    platform: None,
                })
                .collect(),
            platforms: BTreeMap::new(),
            socket_offsets: layout.socket_offsets.clone(),
            max_platforms: layout.max_platforms,
            next_platform_id: 0,
        }
    }

    fn slot_mut(&mut self, slot: SlotId) -> Option<&mut Slot> {
        let index = usize::try_from(slot.get()).ok()?;
        self.slots.get_mut(index)
    }

    fn slot_position(&self, slot: SlotId) -> Option<Vec3> {
        let index = usize::try_from(slot.get()).ok()?;
        self.slots.get(index).map(|slot| slot.position)
    }

    /// Places a new platform on an open slot.
    pub(crate) fn place_platform(&mut self, slot: SlotId) -> Option<PlatformId> {
        let socket_count = self.socket_offsets.len();
        let id = PlatformId::new(self.next_platform_id);
        let entry = self.slot_mut(slot)?;
        if entry.platform.is_some() {
            return None;
        }

        entry.platform = Some(id);
        self.next_platform_id = self.next_platform_id.saturating_add(1);
        let _ = self.platforms.insert(
            id,
            Platform {
                slot,
                sockets: vec![None; socket_count],
            },
        );
        Some(id)
    }

    /// Moves a platform onto an open slot, returning the slot it left.
    pub(crate) fn move_platform(&mut self, platform: PlatformId, to: SlotId) -> Option<SlotId> {
        let from = self.platforms.get(&platform)?.slot;
        let destination = self.slot_mut(to)?;
        if destination.platform.is_some() {
            return None;
        }
        destination.platform = Some(platform);

        if let Some(origin) = self.slot_mut(from) {
            origin.platform = None;
        }
        if let Some(entry) = self.platforms.get_mut(&platform) {
            entry.slot = to;
        }
        Some(from)
    }

    /// Seats a tower in an empty socket.
    pub(crate) fn seat_tower(&mut self, socket: SocketRef, tower: EntityId) -> bool {
        match self.socket_mut(socket) {
            Some(entry) if entry.is_none() => {
                *entry = Some(tower);
                true
            }
            _ => false,
        }
    }

    /// Clears a socket if it holds the provided tower.
    pub(crate) fn vacate(&mut self, socket: SocketRef, tower: EntityId) {
        if let Some(entry) = self.socket_mut(socket) {
            if *entry == Some(tower) {
                *entry = None;
            }
        }
    }

    fn socket_mut(&mut self, socket: SocketRef) -> Option<&mut Option<EntityId>> {
        let index = usize::try_from(socket.index()).ok()?;
        self.platforms
            .get_mut(&socket.platform())?
            .sockets
            .get_mut(index)
    }

    /// World position of a socket: platform slot position plus socket offset.
    pub(crate) fn socket_position(&self, socket: SocketRef) -> Option<Vec3> {
        let platform = self.platforms.get(&socket.platform())?;
        let index = usize::try_from(socket.index()).ok()?;
        let offset = self.socket_offsets.get(index)?;
        Some(self.slot_position(platform.slot)? + *offset)
    }

    /// Towers seated on the provided platform.
    pub(crate) fn towers_on(&self, platform: PlatformId) -> Vec<(SocketRef, EntityId)> {
        self.platforms
            .get(&platform)
            .map(|entry| {
                entry
                    .sockets
                    .iter()
                    .enumerate()
                    .filter_map(|(index, occupant)| {
                        let index = u32::try_from(index).ok()?;
                        occupant.map(|tower| (SocketRef::new(platform, index), tower))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            slots: self
                .slots
                .iter()
                .zip(0_u32..)
                .map(|(slot, index)| SlotSnapshot {
                    id: SlotId::new(index),
                    position: slot.position,
                    platform: slot.platform,
                })
                .collect(),
            platforms: self
                .platforms
                .iter()
                .map(|(&id, platform)| PlatformSnapshot {
                    id,
                    slot: platform.slot,
                    sockets: platform.sockets.clone(),
                })
                .collect(),
            max_platforms: self.max_platforms,
        }
    }
}
