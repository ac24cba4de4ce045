// Role ↔ Power assignment endpoints

use serde::Serialize;

use crate::client::ApiClient;
use crate::error::Error;

#[derive(Debug, Serialize)]
struct AssignPowersBody<'a> {
    power_ids: &'a [i64],
}

impl ApiClient {
    /// Power identifiers currently granted to a role.
    pub async fn role_powers(&self, role_id: i64) -> Result<Vec<i64>, Error> {
        self.get::<Vec<i64>>(&format!("roles/{role_id}/powers"))
            .await?
            .into_data()
    }

    /// Replace a role's power set wholesale. Returns the set as stored.
    pub async fn set_role_powers(&self, role_id: i64, power_ids: &[i64]) -> Result<Vec<i64>, Error> {
        self.put::<Vec<i64>>(
            &format!("roles/{role_id}/powers"),
            &AssignPowersBody { power_ids },
        )
        .await?
        .into_data()
    }
}
