use rand::Rng;
use rand::RngCore;

const FIRST_NAMES: &[&str] = &[
    "Adam", "Bruno", "Caio", "Dani", "Emeka", "Felix", "Gabriel", "Hugo", "Ivan", "Jonas",
    "Kenji", "Luca", "Mateo", "Nico", "Oscar", "Pablo", "Rafael", "Sami", "Theo", "Victor",
    "Wilfried", "Yann", "Zeki", "Ruben", "Tiago", "Marcus", "Jadon", "Kobe", "Leon", "Diego",
];

const SURNAMES: &[&str] = &[
    "Almeida", "Bakker", "Costa", "Diallo", "Eriksen", "Fernandes", "Garcia", "Hughes",
    "Ito", "Janssen", "Keller", "Lopez", "Mendes", "Nwosu", "Okafor", "Pereira", "Quinn",
    "Rossi", "Silva", "Takahashi", "Umeh", "Vidal", "Walsh", "Yamada", "Zuniga", "Moreau",
    "Dupont", "Navarro", "Ward", "Campbell",
];

const CLUBS: &[&str] = &[
    "Northbridge Athletic", "Riverside United", "Castlegate Rovers", "Harbour City",
    "Eastfield Wanderers", "Kingsmoor Town", "Redcliffe Albion", "Westholm Villa",
    "Southport Rangers", "Millbrook County", "Highgate Forest", "Ashworth Olympic",
];

/// Generate a random person name (first + surname).
pub fn generate_person_name(rng: &mut dyn RngCore) -> String {
    let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
    let surname = SURNAMES[rng.random_range(0..SURNAMES.len())];
    format!("{first} {surname}")
}

/// Pick a club name.
pub fn generate_club_name(rng: &mut dyn RngCore) -> String {
    CLUBS[rng.random_range(0..CLUBS.len())].to_string()
}

/// A stable name for the `n`th hire, for commands that take no randomness.
pub fn indexed_person_name(n: u64) -> String {
    let first = FIRST_NAMES[(n as usize) % FIRST_NAMES.len()];
    let surname = SURNAMES[(n as usize / FIRST_NAMES.len() + n as usize * 7) % SURNAMES.len()];
    format!("{first} {surname}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn generates_two_part_name() {
        let mut rng = SmallRng::seed_from_u64(42);
        let name = generate_person_name(&mut rng);
        assert_eq!(name.split(' ').count(), 2);
    }

    #[test]
    fn deterministic_with_same_seed() {
        let mut a = SmallRng::seed_from_u64(7);
        let mut b = SmallRng::seed_from_u64(7);
        assert_eq!(generate_club_name(&mut a), generate_club_name(&mut b));
    }

    #[test]
    fn indexed_names_are_stable() {
        assert_eq!(indexed_person_name(3), indexed_person_name(3));
        assert_ne!(indexed_person_name(3), indexed_person_name(4));
    }
}
