//! Passcode issuance.

use rand::Rng;

use super::{repository::RoomRepository, value_object::Passcode};

/// Exclusive upper bound of the numeric passcode space (10^8).
const PASSCODE_SPACE: u32 = 100_000_000;

/// Passcode を生成する Factory
pub struct PasscodeFactory;

impl PasscodeFactory {
    /// Uniformly random 8-digit passcode, leading zeros allowed.
    pub fn generate() -> Passcode {
        let value = rand::rng().random_range(0..PASSCODE_SPACE);
        Passcode::from_number(value)
    }

    /// Generate until a passcode unknown to `repository` is found.
    ///
    /// Never gives up; with 10^8 codes a collision is rare. Nothing is
    /// reserved here, the caller inserts the room.
    pub async fn generate_unique(repository: &dyn RoomRepository) -> Passcode {
        let mut attempts: u32 = 0;
        loop {
            let passcode = Self::generate();
            attempts += 1;
            if !repository.exists(&passcode).await {
                if attempts > 1 {
                    tracing::debug!(attempts, "passcode collision resolved by regeneration");
                }
                return passcode;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Room, Timestamp};
    use crate::infrastructure::repository::InMemoryRoomRepository;

    #[test]
    fn test_generate_is_eight_digits() {
        // テスト項目: 生成されるパスコードは常に 8 桁の数字
        for _ in 0..1_000 {
            // when (操作):
            let passcode = PasscodeFactory::generate();

            // then (期待する結果):
            assert_eq!(passcode.as_str().len(), 8);
            assert!(passcode.as_str().bytes().all(|b| b.is_ascii_digit()));
            assert_eq!(Passcode::normalize(passcode.as_str()).unwrap(), passcode);
        }
    }

    #[tokio::test]
    async fn test_generate_unique_avoids_existing_codes() {
        // テスト項目: 1 万件登録済みのレジストリに対して既存コードを返さない
        // given (前提条件):
        let repository = InMemoryRoomRepository::new();
        for n in 0..10_000u32 {
            let room = Room::new(Passcode::from_number(n * 7_919), Timestamp::new(0));
            repository.create_room(room).await.unwrap();
        }
        assert_eq!(repository.count_rooms().await, 10_000);

        for _ in 0..1_000 {
            // when (操作):
            let passcode = PasscodeFactory::generate_unique(&repository).await;

            // then (期待する結果):
            assert!(!repository.exists(&passcode).await);
        }
    }
}
