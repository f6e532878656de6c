//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler la session de frappes aléatoires sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - longueurs bornées
//! - budget temps global
//! - invariants structurels vérifiés après chaque touche :
//!   jamais deux opérateurs adjacents, point seulement en queue,
//!   fermantes jamais en excès, affichage jamais vide
//! - l'évaluation rend toujours une issue définie (nombre fini ou erreur)

use std::time::{Duration, Instant};

use super::eval;
use super::jetons::{Jeton, Operateur};
use super::saisie::{Calculatrice, Flux, Parenthese, Touche};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération de touches ------------------------ */

fn operateur_aleatoire(rng: &mut Rng) -> Operateur {
    match rng.pick(5) {
        0 => Operateur::Plus,
        1 => Operateur::Moins,
        2 => Operateur::Fois,
        3 => Operateur::Division,
        _ => Operateur::Puissance,
    }
}

fn touche_aleatoire(rng: &mut Rng) -> Touche {
    match rng.pick(10) {
        0..=3 => Touche::Chiffre(rng.pick(10) as u8),
        4 | 5 => Touche::Operateur(operateur_aleatoire(rng)),
        6 => Touche::Point,
        7 => Touche::Parenthese(if rng.coin() {
            Parenthese::Ouvrante
        } else {
            Parenthese::Fermante
        }),
        8 => Touche::Signe,
        _ => {
            if rng.coin() {
                Touche::Retour
            } else {
                Touche::Reponse
            }
        }
    }
}

/* ------------------------ Invariants structurels ------------------------ */

fn verifie_invariants(flux: &Flux) {
    let jetons = flux.jetons();

    for (i, paire) in jetons.windows(2).enumerate() {
        assert!(
            !(matches!(paire[0], Jeton::Operateur(_)) && matches!(paire[1], Jeton::Operateur(_))),
            "opérateurs adjacents en {i}: {jetons:?}"
        );
    }

    for (i, jeton) in jetons.iter().enumerate() {
        if matches!(jeton, Jeton::Point) {
            assert_eq!(i, jetons.len() - 1, "point hors queue: {jetons:?}");
        }
    }

    let mut ouvertes: isize = 0;
    for jeton in jetons {
        match jeton {
            Jeton::ParOuvrante => ouvertes += 1,
            Jeton::ParFermante => ouvertes -= 1,
            _ => {}
        }
        assert!(ouvertes >= 0, "fermante en excès: {jetons:?}");
    }
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_invariants_et_issue_definie() {
    let t0 = Instant::now();
    let max = Duration::from_millis(400);

    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut vus_ok = 0usize;
    let mut vus_err = 0usize;

    for _ in 0..60 {
        budget(t0, max);

        let mut c = Calculatrice::default();
        for _ in 0..40 {
            c.applique(touche_aleatoire(&mut rng));
            verifie_invariants(c.flux());
            assert!(!c.affichage().is_empty());
        }

        match eval::evaluer(c.flux()) {
            Ok(v) => {
                assert!(v.is_finite(), "issue Ok non finie");
                vus_ok += 1;
            }
            Err(_) => vus_err += 1,
        }

        // la touche '=' elle-même laisse toujours une session vide et saine
        let _ = c.egal();
        assert!(c.est_vide());
    }

    // chaque session a rendu une issue définie
    assert_eq!(vus_ok + vus_err, 60);
    assert!(vus_err > 0, "aucune erreur vue: fuzz trop sage");
}

#[test]
fn fuzz_safe_annulation_draine_toujours() {
    let t0 = Instant::now();
    let max = Duration::from_millis(400);

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..40 {
        budget(t0, max);

        let mut c = Calculatrice::default();
        // un résultat en mémoire pour exercer aussi le rappel
        c.applique(Touche::Chiffre(7));
        let _ = c.egal();

        for _ in 0..30 {
            c.applique(touche_aleatoire(&mut rng));
        }

        let mut pas = 0usize;
        while !c.est_vide() {
            c.applique(Touche::Retour);
            verifie_invariants(c.flux());
            pas += 1;
            assert!(pas <= 2000, "annulation sans fin: {:?}", c.flux());
        }
    }
}

#[test]
fn fuzz_safe_determinisme() {
    let t0 = Instant::now();
    let max = Duration::from_millis(400);

    let transcrit = |seed: u64| -> Vec<String> {
        let mut rng = Rng::new(seed);
        let mut c = Calculatrice::default();
        let mut sorties = Vec::new();

        for _ in 0..200 {
            c.applique(touche_aleatoire(&mut rng));
            sorties.push(c.affichage());
            if rng.pick(16) == 0 {
                if let Some(r) = c.egal() {
                    sorties.push(r);
                }
            }
        }
        sorties
    };

    let a = transcrit(0xFEED_u64);
    budget(t0, max);
    let b = transcrit(0xFEED_u64);

    assert_eq!(a, b, "même seed => même transcription");
}
