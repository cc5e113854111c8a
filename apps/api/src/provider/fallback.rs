//! Fallback pool — pre-authored resumes served when generation is disabled
//! or fails, plus the pluggable selector that picks one of them.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::resume::{Contact, Experience, Resume};

/// Picks an index in `0..len` for each fallback draw. Draws are independent
/// (with replacement).
pub trait FallbackSelector: Send + Sync {
    fn select(&self, len: usize) -> usize;
}

/// Uniform draw from the thread-local RNG.
pub struct RandomSelector;

impl FallbackSelector for RandomSelector {
    fn select(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Uniform draw from a seeded RNG, reproducible across runs.
pub struct SeededSelector {
    rng: Mutex<StdRng>,
}

impl SeededSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl FallbackSelector for SeededSelector {
    fn select(&self, len: usize) -> usize {
        // A poisoned lock only means another draw panicked; the RNG state is still usable.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(0..len)
    }
}

/// Immutable, non-empty set of fallback resumes.
#[derive(Debug, Clone)]
pub struct FallbackPool {
    resumes: Vec<Resume>,
}

impl FallbackPool {
    pub fn builtin() -> Self {
        Self {
            resumes: builtin_pool(),
        }
    }

    pub fn resumes(&self) -> &[Resume] {
        &self.resumes
    }

    pub fn choose(&self, selector: &dyn FallbackSelector) -> &Resume {
        let idx = selector.select(self.resumes.len());
        &self.resumes[idx % self.resumes.len()]
    }
}

pub fn builtin_pool() -> Vec<Resume> {
    vec![
        Resume {
            name: "Dr. Whiskers McFluffington".to_string(),
            title: "Chief Happiness Officer & Professional Cat Herder".to_string(),
            summary: "Seasoned feline management specialist with over 12 years of experience in \
                optimizing purr productivity and implementing state-of-the-art nap scheduling \
                systems. Expert in cross-species communication and emergency yarn detangling."
                .to_string(),
            contact: Contact {
                email: "whiskers.mcfluff@purrfectcorp.com".to_string(),
                phone: "(555) MEOW-CAT".to_string(),
                location: "Catnip Valley, CA".to_string(),
            },
            experience: vec![
                experience(
                    "Purrfect Corporation",
                    "Senior Nap Coordinator",
                    "2019 - Present",
                    "Revolutionized workplace productivity by implementing mandatory 14-hour nap \
                    schedules, resulting in 300% increase in employee satisfaction and purr \
                    frequency.",
                ),
                experience(
                    "Fuzzy Logic Solutions",
                    "Lead Treat Distribution Analyst",
                    "2015 - 2019",
                    "Developed proprietary algorithms for optimal treat distribution timing, \
                    reducing workplace hissing incidents by 87% and increasing tail wag metrics.",
                ),
                experience(
                    "Yarn Ball Enterprises",
                    "Junior String Theory Specialist",
                    "2012 - 2015",
                    "Conducted extensive research in advanced string entanglement patterns and \
                    their applications in modern cat entertainment systems.",
                ),
            ],
            skills: skills([
                "Advanced Purring Techniques",
                "Professional Box Sitting",
                "Laser Dot Tracking",
                "Tuna Can Opening",
                "Strategic Hairball Placement",
            ]),
        },
        Resume {
            name: "Captain Nebula Stardust".to_string(),
            title: "Intergalactic Pizza Delivery Specialist".to_string(),
            summary: "Experienced cosmic courier with expertise in delivering hot, fresh pizza \
                across multiple galaxies within 30 minutes or less. Fluent in 47 alien languages \
                and certified in zero-gravity cheese stretching techniques."
                .to_string(),
            contact: Contact {
                email: "nebula.stardust@cosmicpizza.galaxy".to_string(),
                phone: "(555) UFO-PIZZA".to_string(),
                location: "Space Station Alpha-7, Milky Way".to_string(),
            },
            experience: vec![
                experience(
                    "Cosmic Pizza Co.",
                    "Senior Wormhole Navigator",
                    "2020 - Present",
                    "Successfully delivered over 10,000 pizzas across 12 solar systems with a \
                    99.7% on-time delivery rate, even during black hole traffic jams.",
                ),
                experience(
                    "Martian Munchies Inc.",
                    "Asteroid Belt Route Manager",
                    "2017 - 2020",
                    "Pioneered the first commercial delivery routes through the asteroid belt, \
                    reducing delivery times to outer planets by 40% while maintaining pizza \
                    temperature integrity.",
                ),
                experience(
                    "Saturn Ring Restaurants",
                    "Anti-Gravity Training Instructor",
                    "2014 - 2017",
                    "Trained over 200 delivery pilots in zero-gravity pizza handling techniques \
                    and emergency comet evasion maneuvers.",
                ),
            ],
            skills: skills([
                "Hyperdrive Navigation",
                "Alien Customer Service",
                "Zero-G Pizza Spinning",
                "Meteorite Dodging",
                "Universal Translator Proficiency",
            ]),
        },
        Resume {
            name: "Professor Bubble Maximillian".to_string(),
            title: "Chief Bubble Engineer & Sudsy Solutions Architect".to_string(),
            summary: "Distinguished bubble scientist with a PhD in Advanced Soap Dynamics and \
                over 15 years of experience in creating the perfect bubble solutions. Holds 23 \
                patents in bubble longevity technology and rainbow reflection optimization."
                .to_string(),
            contact: Contact {
                email: "bubble.max@soapscience.com".to_string(),
                phone: "(555) POP-SOAP".to_string(),
                location: "Bubble Bay, Rainbow Islands".to_string(),
            },
            experience: vec![
                experience(
                    "Rainbow Bubble Dynamics",
                    "Principal Soap Scientist",
                    "2018 - Present",
                    "Led breakthrough research in self-repairing bubble membranes, achieving \
                    record-breaking bubble lifespans of up to 3.7 hours in controlled \
                    environments.",
                ),
                experience(
                    "Sudsy Solutions Laboratory",
                    "Senior Foam Architect",
                    "2013 - 2018",
                    "Designed revolutionary bubble-blowing apparatus capable of producing \
                    bubbles in 47 different geometric shapes, including dodecahedrons and Klein \
                    bottles.",
                ),
                experience(
                    "Giggle & Pop Entertainment",
                    "Bubble Show Coordinator",
                    "2009 - 2013",
                    "Orchestrated over 500 bubble performances for audiences ranging from \
                    birthday parties to intergalactic peace summits, achieving 100% giggle \
                    satisfaction rates.",
                ),
            ],
            skills: skills([
                "Molecular Soap Engineering",
                "Advanced Bubble Choreography",
                "Wind Resistance Calculations",
                "Rainbow Refraction Analysis",
                "Professional Giggle Induction",
            ]),
        },
    ]
}

fn experience(company: &str, role: &str, duration: &str, description: &str) -> Experience {
    Experience {
        company: company.to_string(),
        role: role.to_string(),
        duration: duration.to_string(),
        description: description.to_string(),
    }
}

fn skills(names: [&str; 5]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Always returns the same index.
    pub(crate) struct FixedSelector(pub usize);

    impl FallbackSelector for FixedSelector {
        fn select(&self, _len: usize) -> usize {
            self.0
        }
    }

    #[test]
    fn test_builtin_pool_has_three_valid_resumes() {
        let pool = FallbackPool::builtin();
        assert_eq!(pool.resumes().len(), 3);
        for resume in pool.resumes() {
            assert!(
                resume.validate().is_ok(),
                "{} fails validation",
                resume.name
            );
        }
    }

    #[test]
    fn test_builtin_names_are_distinct() {
        let pool = FallbackPool::builtin();
        let names: std::collections::HashSet<&str> =
            pool.resumes().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_fallback_resume_json_round_trip() {
        for resume in builtin_pool() {
            let json = serde_json::to_string(&resume).unwrap();
            let recovered: Resume = serde_json::from_str(&json).unwrap();
            assert_eq!(recovered, resume);
        }
    }

    #[test]
    fn test_choose_uses_selector_index() {
        let pool = FallbackPool::builtin();
        assert_eq!(
            pool.choose(&FixedSelector(1)).name,
            "Captain Nebula Stardust"
        );
        assert_eq!(
            pool.choose(&FixedSelector(2)).name,
            "Professor Bubble Maximillian"
        );
    }

    #[test]
    fn test_out_of_range_index_wraps() {
        let pool = FallbackPool::builtin();
        assert_eq!(
            pool.choose(&FixedSelector(3)).name,
            "Dr. Whiskers McFluffington"
        );
    }

    #[test]
    fn test_seeded_selector_is_reproducible() {
        let a = SeededSelector::new(42);
        let b = SeededSelector::new(42);
        let draws_a: Vec<usize> = (0..20).map(|_| a.select(3)).collect();
        let draws_b: Vec<usize> = (0..20).map(|_| b.select(3)).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn test_selection_is_roughly_uniform() {
        let pool = FallbackPool::builtin();
        let selector = SeededSelector::new(7);
        let mut counts = [0usize; 3];
        for _ in 0..3000 {
            let chosen = pool.choose(&selector);
            let idx = pool
                .resumes()
                .iter()
                .position(|r| r == chosen)
                .unwrap();
            counts[idx] += 1;
        }
        for count in counts {
            assert!((850..=1150).contains(&count), "biased counts: {counts:?}");
        }
    }

    #[test]
    fn test_random_selector_stays_in_range() {
        for _ in 0..100 {
            assert!(RandomSelector.select(3) < 3);
        }
    }
}
