use super::domain::QualificationTier;

/// Agent-facing next step for a lead with the given score.
pub fn recommendation(score: u8) -> &'static str {
    match score {
        9.. => "Lead très chaud : appeler immédiatement, fort potentiel de mandat. Priorité absolue.",
        7..=8 => "Lead chaud : contacter sous 24h et planifier une visite rapidement.",
        5..=6 => "Lead tiède : e-mail de suivi personnalisé, relancer sous 48h sans réponse.",
        4 => "Lead tiède : ajouter à la campagne de nurturing automatique.",
        _ => "Lead froid : suivi automatique par e-mail uniquement, faible priorité.",
    }
}

/// Message returned to the person who submitted the form.
pub fn acknowledgement(tier: QualificationTier) -> &'static str {
    match tier {
        QualificationTier::Hot => {
            "Merci ! Votre projet a retenu notre attention, un conseiller vous rappelle dans l'heure."
        }
        QualificationTier::Warm | QualificationTier::Cold => {
            "Merci. Nous analysons votre demande, un e-mail de suivi vous sera envoyé sous 24h."
        }
    }
}
