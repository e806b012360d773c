//! Command codes of the control protocol.

/// Commands understood by intercom stations.
///
/// Codes are grouped into families by their high byte: security events
/// (`0x00xx`), access control (`0x01xx`), elevator control (`0x02xx`), call
/// records (`0x03xx`), file transfer (`0x04xx`), device maintenance
/// (`0x05xx`) and bulk data (`0x06xx`). The family determines which module
/// contributes the command's body codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Command {
    /// Store an arming/disarming record.
    SaveSecurityRecord = 0x0001,
    /// Remotely arm or disarm a zone.
    RemoteArming = 0x0002,
    /// Zone alarm report from a station.
    UploadSecurityAlert = 0x0003,
    /// Store an emergency help request.
    EmergencyHelp = 0x0004,

    /// Store a single access card record.
    DownloadCard = 0x0101,
    /// Delete one access card.
    DeleteCard = 0x0102,
    /// Delete all cards of one resident unit.
    DeleteUserCards = 0x0103,
    /// Delete all patrol cards.
    DeletePatrolCards = 0x0104,
    /// Delete every card held by the station.
    DeleteAllCards = 0x0105,
    /// Card swipe record report.
    UploadCardRecord = 0x0106,
    /// Password unlock record report.
    UploadPasswordRecord = 0x0107,
    /// Door state change report.
    UploadLockRecord = 0x0108,
    /// Remotely release a door lock.
    RemoteUnlock = 0x0109,
    /// Patrol card swipe report.
    UploadPatrolRecord = 0x010A,

    /// Call an elevator to a floor.
    CallLift = 0x0201,
    /// Call an elevator with a destination floor.
    CallLiftWithDestination = 0x0202,
    /// Elevator access by card swipe.
    CallLiftByCard = 0x0203,
    /// Get or set the current elevator status.
    GetSetLiftInfo = 0x0204,

    /// Store a call record.
    WriteTalkRecord = 0x0301,

    /// Delete a file.
    FileDelete = 0x0401,
    /// List every file under a path.
    FileScan = 0x0402,
    /// Create a directory.
    FileMkdir = 0x0403,
    /// Rename a file.
    FileRename = 0x0404,
    /// Check that storage and memory can hold a transfer.
    FileCheckSize = 0x0405,
    /// Check that a file exists.
    FileCheckFile = 0x0406,

    /// Get or set protocol and firmware version information.
    GetSetVersionInfo = 0x0501,
    /// Get or set the station's clock.
    GetSetDateTime = 0x0502,
    /// Store a device fault record.
    WriteDeviceRecord = 0x0503,
    /// Acknowledge that an information message was received.
    WriteInfo = 0x0504,

    /// Read or write a bulk data block.
    ReadWriteBigData = 0x0601,
}

impl Command {
    /// Numeric wire code of the command.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Look up a command by its wire code.
    pub fn from_code(code: u16) -> Option<Self> {
        Some(match code {
            0x0001 => Command::SaveSecurityRecord,
            0x0002 => Command::RemoteArming,
            0x0003 => Command::UploadSecurityAlert,
            0x0004 => Command::EmergencyHelp,
            0x0101 => Command::DownloadCard,
            0x0102 => Command::DeleteCard,
            0x0103 => Command::DeleteUserCards,
            0x0104 => Command::DeletePatrolCards,
            0x0105 => Command::DeleteAllCards,
            0x0106 => Command::UploadCardRecord,
            0x0107 => Command::UploadPasswordRecord,
            0x0108 => Command::UploadLockRecord,
            0x0109 => Command::RemoteUnlock,
            0x010A => Command::UploadPatrolRecord,
            0x0201 => Command::CallLift,
            0x0202 => Command::CallLiftWithDestination,
            0x0203 => Command::CallLiftByCard,
            0x0204 => Command::GetSetLiftInfo,
            0x0301 => Command::WriteTalkRecord,
            0x0401 => Command::FileDelete,
            0x0402 => Command::FileScan,
            0x0403 => Command::FileMkdir,
            0x0404 => Command::FileRename,
            0x0405 => Command::FileCheckSize,
            0x0406 => Command::FileCheckFile,
            0x0501 => Command::GetSetVersionInfo,
            0x0502 => Command::GetSetDateTime,
            0x0503 => Command::WriteDeviceRecord,
            0x0504 => Command::WriteInfo,
            0x0601 => Command::ReadWriteBigData,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_round_trip() {
        for command in [
            Command::SaveSecurityRecord,
            Command::RemoteUnlock,
            Command::UploadPatrolRecord,
            Command::GetSetLiftInfo,
            Command::FileCheckFile,
            Command::GetSetVersionInfo,
            Command::ReadWriteBigData,
        ] {
            assert_eq!(Command::from_code(command.code()), Some(command));
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(Command::from_code(0x0000), None);
        assert_eq!(Command::from_code(0x010B), None);
        assert_eq!(Command::from_code(0x0701), None);
        assert_eq!(Command::from_code(0xFFFF), None);
    }
}
