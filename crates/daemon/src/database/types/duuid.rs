use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Sqlite, Type};
use uuid::Uuid;

/// UUID column stored as hyphenated TEXT (share ids, roles, creators)
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct DUuid(Uuid);

impl DUuid {
    /// A fresh random (v4) id for a new row
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for DUuid {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<DUuid> for Uuid {
    fn from(id: DUuid) -> Self {
        id.0
    }
}

impl Deref for DUuid {
    type Target = Uuid;

    fn deref(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for DUuid {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Display for DUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl Type<Sqlite> for DUuid {
    fn type_info() -> SqliteTypeInfo {
        <&str as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <&str as Type<Sqlite>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Sqlite> for DUuid {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let text = <&str as Decode<Sqlite>>::decode(value)?;
        Ok(text.parse()?)
    }
}

impl Encode<'_, Sqlite> for DUuid {
    fn encode_by_ref(
        &self,
        args: &mut Vec<SqliteArgumentValue<'_>>,
    ) -> Result<IsNull, BoxDynError> {
        args.push(SqliteArgumentValue::Text(self.to_string().into()));
        Ok(IsNull::No)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encodes_hyphenated_text() -> Result<(), BoxDynError> {
        let id: DUuid = "6F1C0E9A3B7D4D2E9A510C8F2B7E4D10".parse()?;

        let mut args = Vec::new();
        id.encode_by_ref(&mut args)?;

        match &args[0] {
            SqliteArgumentValue::Text(text) => {
                assert_eq!(text.as_ref(), "6f1c0e9a-3b7d-4d2e-9a51-0c8f2b7e4d10")
            }
            _ => panic!("uuid should bind as text"),
        }
        Ok(())
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("share-1".parse::<DUuid>().is_err());
    }
}
