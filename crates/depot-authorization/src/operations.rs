//! Closed enumeration of permission fields and operations
//!
//! Both the fields and the operations are closed enums with a fixed
//! slot table, so an unknown operation or a misplaced offset is a
//! compile error instead of a runtime lookup failure.

use crate::codec::BitWidth;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single packed integer column of permission slots.
///
/// One field per administrative area; its declared width bounds how
/// many operations it can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionField {
    /// Parts and their stock
    Parts,
    /// Part categories
    Categories,
    /// Storage locations
    Locations,
    /// Component footprints
    Footprints,
    /// Manufacturers
    Manufacturers,
    /// Suppliers
    Suppliers,
    /// Attachments and attachment types
    Attachments,
    /// User administration
    Users,
    /// Group administration
    Groups,
    /// Server maintenance
    System,
    /// Database maintenance
    Database,
    /// Label printing
    Labels,
    /// A user's own account
    SelfAccount,
}

impl PermissionField {
    /// All fields, in register order.
    pub const ALL: &'static [PermissionField] = &[
        Self::Parts,
        Self::Categories,
        Self::Locations,
        Self::Footprints,
        Self::Manufacturers,
        Self::Suppliers,
        Self::Attachments,
        Self::Users,
        Self::Groups,
        Self::System,
        Self::Database,
        Self::Labels,
        Self::SelfAccount,
    ];

    /// Number of fields in a register.
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this field inside a register.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Declared bit width of the packed column.
    pub fn width(self) -> BitWidth {
        match self {
            Self::Parts | Self::Users => BitWidth::W32,
            _ => BitWidth::W16,
        }
    }
}

impl fmt::Display for PermissionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

macro_rules! operations {
    ($( $(#[$doc:meta])* $variant:ident => ($field:ident, $offset:literal), )+) => {
        /// Every grantable operation, each occupying one 2-bit slot in
        /// its field.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Operation {
            $( $(#[$doc])* $variant, )+
        }

        impl Operation {
            /// All operations, for admin surfaces and exhaustive tests.
            pub const ALL: &'static [Operation] = &[ $(Operation::$variant),+ ];

            /// The field and even bit offset this operation occupies.
            pub fn slot(self) -> (PermissionField, u8) {
                match self {
                    $( Self::$variant => (PermissionField::$field, $offset), )+
                }
            }
        }
    };
}

operations! {
    /// View parts
    PartsRead => (Parts, 0),
    /// Edit part properties
    PartsEdit => (Parts, 2),
    /// Create new parts
    PartsCreate => (Parts, 4),
    /// Delete parts
    PartsDelete => (Parts, 6),
    /// Move parts between categories
    PartsMove => (Parts, 8),
    /// Edit part prices
    PartsEditPrices => (Parts, 10),
    /// Withdraw or add stock
    PartsEditStock => (Parts, 12),
    /// Import parts in bulk
    PartsImport => (Parts, 14),
    /// Export parts in bulk
    PartsExport => (Parts, 16),
    /// View part edit history
    PartsShowHistory => (Parts, 18),

    /// View categories
    CategoriesRead => (Categories, 0),
    /// Edit category properties
    CategoriesEdit => (Categories, 2),
    /// Create new categories
    CategoriesCreate => (Categories, 4),
    /// Delete categories
    CategoriesDelete => (Categories, 6),
    /// Move categories within the tree
    CategoriesMove => (Categories, 8),

    /// View storage locations
    LocationsRead => (Locations, 0),
    /// Edit storage location properties
    LocationsEdit => (Locations, 2),
    /// Create new storage locations
    LocationsCreate => (Locations, 4),
    /// Delete storage locations
    LocationsDelete => (Locations, 6),
    /// Move storage locations within the tree
    LocationsMove => (Locations, 8),

    /// View footprints
    FootprintsRead => (Footprints, 0),
    /// Edit footprint properties
    FootprintsEdit => (Footprints, 2),
    /// Create new footprints
    FootprintsCreate => (Footprints, 4),
    /// Delete footprints
    FootprintsDelete => (Footprints, 6),
    /// Move footprints within the tree
    FootprintsMove => (Footprints, 8),

    /// View manufacturers
    ManufacturersRead => (Manufacturers, 0),
    /// Edit manufacturer properties
    ManufacturersEdit => (Manufacturers, 2),
    /// Create new manufacturers
    ManufacturersCreate => (Manufacturers, 4),
    /// Delete manufacturers
    ManufacturersDelete => (Manufacturers, 6),
    /// Move manufacturers within the tree
    ManufacturersMove => (Manufacturers, 8),

    /// View suppliers
    SuppliersRead => (Suppliers, 0),
    /// Edit supplier properties
    SuppliersEdit => (Suppliers, 2),
    /// Create new suppliers
    SuppliersCreate => (Suppliers, 4),
    /// Delete suppliers
    SuppliersDelete => (Suppliers, 6),
    /// Move suppliers within the tree
    SuppliersMove => (Suppliers, 8),

    /// View attachments
    AttachmentsRead => (Attachments, 0),
    /// Edit attachments and attachment types
    AttachmentsEdit => (Attachments, 2),
    /// Create new attachments
    AttachmentsCreate => (Attachments, 4),
    /// Delete attachments
    AttachmentsDelete => (Attachments, 6),
    /// View attachments marked private
    AttachmentsShowPrivate => (Attachments, 8),

    /// View user accounts
    UsersRead => (Users, 0),
    /// Edit user properties
    UsersEdit => (Users, 2),
    /// Create new user accounts
    UsersCreate => (Users, 4),
    /// Delete user accounts
    UsersDelete => (Users, 6),
    /// Edit another user's permission register
    UsersEditPermissions => (Users, 8),
    /// Set another user's password
    UsersSetPassword => (Users, 10),
    /// Reset another user's two-factor setup
    UsersResetTwoFactor => (Users, 12),

    /// View groups
    GroupsRead => (Groups, 0),
    /// Edit group properties
    GroupsEdit => (Groups, 2),
    /// Create new groups
    GroupsCreate => (Groups, 4),
    /// Delete groups
    GroupsDelete => (Groups, 6),
    /// Edit a group's permission register
    GroupsEditPermissions => (Groups, 8),

    /// View server logs
    SystemShowLogs => (System, 0),
    /// Clear server logs
    SystemClearLogs => (System, 2),
    /// View server status information
    SystemServerInfo => (System, 4),
    /// Edit server options
    SystemEditOptions => (System, 6),

    /// Inspect database backups
    DatabaseSeeBackups => (Database, 0),
    /// Run database migrations
    DatabaseUpdate => (Database, 2),

    /// Print labels
    LabelsCreate => (Labels, 0),
    /// View label profiles
    LabelsReadProfiles => (Labels, 2),
    /// Edit label profiles
    LabelsEditProfiles => (Labels, 4),

    /// Edit own account information
    SelfEditInfo => (SelfAccount, 0),
    /// Change own password
    SelfChangePassword => (SelfAccount, 2),
    /// Configure own two-factor setup
    SelfConfigureTwoFactor => (SelfAccount, 4),
    /// View own resolved permissions
    SelfShowPermissions => (SelfAccount, 6),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
