use std::ops::Deref;

use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Sqlite, Type};
use time::OffsetDateTime;

/// UTC timestamp stored as INTEGER unix seconds
///
/// Integer storage keeps range predicates (`date_end >= ?`, `expires < ?`)
/// numeric instead of depending on text formatting of dates.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(transparent)]
pub struct DTimestamp(#[serde(with = "time::serde::timestamp")] OffsetDateTime);

impl DTimestamp {
    pub fn now() -> Self {
        Self::from(OffsetDateTime::now_utc())
    }

    pub fn unix_timestamp(&self) -> i64 {
        self.0.unix_timestamp()
    }
}

impl From<OffsetDateTime> for DTimestamp {
    fn from(dt: OffsetDateTime) -> Self {
        // Sub-second precision is dropped on the way into storage
        let secs = dt.unix_timestamp();
        Self(OffsetDateTime::from_unix_timestamp(secs).unwrap_or(dt))
    }
}

impl From<DTimestamp> for OffsetDateTime {
    fn from(val: DTimestamp) -> Self {
        val.0
    }
}

impl Deref for DTimestamp {
    type Target = OffsetDateTime;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Decode<'_, Sqlite> for DTimestamp {
    fn decode(value: SqliteValueRef<'_>) -> Result<Self, BoxDynError> {
        let secs = <i64 as Decode<Sqlite>>::decode(value)?;
        Ok(Self(OffsetDateTime::from_unix_timestamp(secs)?))
    }
}

impl Encode<'_, Sqlite> for DTimestamp {
    fn encode_by_ref(
        &self,
        args: &mut Vec<SqliteArgumentValue<'_>>,
    ) -> Result<IsNull, BoxDynError> {
        args.push(SqliteArgumentValue::Int64(self.0.unix_timestamp()));
        Ok(IsNull::No)
    }
}

impl Type<Sqlite> for DTimestamp {
    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <i64 as Type<Sqlite>>::compatible(ty)
    }

    fn type_info() -> SqliteTypeInfo {
        <i64 as Type<Sqlite>>::type_info()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn test_encode_as_unix_seconds() -> Result<(), BoxDynError> {
        let ts = DTimestamp::from(datetime!(2025-01-01 00:00:00.750 UTC));

        let mut args = Vec::new();
        let _ = ts.encode_by_ref(&mut args)?;

        if let SqliteArgumentValue::Int64(encoded) = &args[0] {
            assert_eq!(*encoded, 1_735_689_600);
        } else {
            panic!("Expected Int64 variant");
        }

        Ok(())
    }

    #[test]
    fn test_subsecond_precision_is_dropped() {
        let ts = DTimestamp::from(datetime!(2025-01-01 00:00:00.750 UTC));
        assert_eq!(*ts, datetime!(2025-01-01 00:00:00 UTC));
    }
}
